/// 계정 관련 커맨드 처리
/// 1. 회원 가입
/// 2. 로그인
/// 3. 로그아웃
// region:    --- Imports
use super::password::{generate_session_token, hash_password, verify_password};
use crate::auction::{NewUser, User};
use crate::error::AppError;
use crate::store::{SessionRepository, StoreError, UserRepository};
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
const MAX_USERNAME_LEN: usize = 150;
const MAX_EMAIL_LEN: usize = 254;

/// 회원 가입 폼
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

/// 로그인 폼
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// 인증 완료된 세션
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub user: User,
    pub token: String,
}

/// 1. 회원 가입 (성공 시 바로 로그인)
pub async fn register<S>(store: &S, form: RegisterForm) -> Result<SessionGrant, AppError>
where
    S: UserRepository + SessionRepository + ?Sized,
{
    info!("{:<12} --> 회원 가입 요청: {}", "Command", form.username);

    let username = form.username.trim();
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation("Invalid username.".to_string()));
    }
    if form.email.chars().count() > MAX_EMAIL_LEN {
        return Err(AppError::Validation("Invalid email.".to_string()));
    }
    if form.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty.".to_string()));
    }
    if form.password != form.confirmation {
        return Err(AppError::Validation("Passwords must match.".to_string()));
    }

    let new_user = NewUser {
        username: username.to_string(),
        email: form.email.trim().to_string(),
        password_hash: hash_password(&form.password),
    };
    let user = match store.create_user(new_user).await {
        Ok(user) => user,
        Err(StoreError::DuplicateUsername) => {
            return Err(AppError::Validation("Username already taken.".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    open_session(store, user).await
}

/// 2. 로그인
pub async fn login<S>(store: &S, form: LoginForm) -> Result<SessionGrant, AppError>
where
    S: UserRepository + SessionRepository + ?Sized,
{
    info!("{:<12} --> 로그인 요청: {}", "Command", form.username);

    let user = store.find_user_by_username(form.username.trim()).await?;
    match user {
        Some(user) if verify_password(&form.password, &user.password_hash) => {
            open_session(store, user).await
        }
        _ => Err(AppError::Validation(
            "Invalid username and/or password.".to_string(),
        )),
    }
}

/// 3. 로그아웃
pub async fn logout<S>(store: &S, token: &str) -> Result<(), AppError>
where
    S: SessionRepository + ?Sized,
{
    store.delete_session(token).await?;
    Ok(())
}

async fn open_session<S>(store: &S, user: User) -> Result<SessionGrant, AppError>
where
    S: SessionRepository + ?Sized,
{
    let token = generate_session_token();
    store.create_session(&token, user.id).await?;
    info!("{:<12} --> 세션 생성 user_id: {}", "Command", user.id);
    Ok(SessionGrant { user, token })
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn register_form(username: &str, password: &str, confirmation: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = InMemoryStore::new();
        let grant = register(&store, register_form("alice", "pw", "pw"))
            .await
            .unwrap();
        assert_eq!(
            store.session_user(&grant.token).await.unwrap().unwrap().id,
            grant.user.id
        );

        let login_grant = login(
            &store,
            LoginForm {
                username: "alice".to_string(),
                password: "pw".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(login_grant.user.username, "alice");
        assert_ne!(login_grant.token, grant.token);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let store = InMemoryStore::new();
        register(&store, register_form("bob", "right", "right"))
            .await
            .unwrap();
        let err = login(
            &store,
            LoginForm {
                username: "bob".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let store = InMemoryStore::new();
        let grant = register(&store, register_form("carol", "pw", "pw"))
            .await
            .unwrap();
        logout(&store, &grant.token).await.unwrap();
        assert!(store.session_user(&grant.token).await.unwrap().is_none());
        // 두 번째 로그아웃도 오류 없음
        logout(&store, &grant.token).await.unwrap();
    }
}
