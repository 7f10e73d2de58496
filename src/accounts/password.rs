//! 비밀번호 해시.
//!
//! 저장 형식: `sha256$<반복 횟수>$<salt hex>$<digest hex>`

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SCHEME: &str = "sha256";
const ITERATIONS: u32 = 10_000;
const SALT_LEN: usize = 16;

/// 새 salt로 비밀번호 해시 생성
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    encode(&salt, ITERATIONS, password)
}

/// 저장된 해시와 비교. 형식이 잘못된 해시는 항상 불일치
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
        return false;
    };

    let actual = digest(&salt, iterations, password);
    actual.ct_eq(expected.as_slice()).into()
}

fn encode(salt: &[u8], iterations: u32, password: &str) -> String {
    format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        hex::encode(salt),
        hex::encode(digest(salt, iterations, password))
    )
}

fn digest(salt: &[u8], iterations: u32, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut out = hasher.finalize();
    for _ in 1..iterations {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(out);
        out = hasher.finalize();
    }
    out.to_vec()
}

/// 세션 토큰 (32바이트 난수, hex 64자)
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
