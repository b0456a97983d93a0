//! Password digests and strength checks.

use sha2::{Digest, Sha256};

const SALT_PREFIX: &str = "salt_";
const SALT_SUFFIX: &str = "_salt";

const SEQUENCES: [&str; 5] = [
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
];

const COMMON_PASSWORDS: [&str; 16] = [
    "password", "password1", "passw0rd", "12345678", "123456789", "1234567890",
    "qwerty123", "qwertyuiop", "iloveyou", "letmein1", "admin123", "welcome1",
    "11111111", "abc12345", "sunshine", "football",
];

/// Hex SHA-256 of the password wrapped in a fixed salt.
///
/// Rows hashed with MD5 over the same `salt_<password>_salt` input do not
/// verify here; such users have to register again.
///
/// WARNING: a single pass of a fast digest with a salt shared by every user
/// is not a password hashing scheme. Identical passwords produce identical
/// hashes and offline guessing is cheap. Replacing it (argon2/bcrypt with
/// per-user salts) needs a rehash on next login.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(format!("{}{}{}", SALT_PREFIX, password, SALT_SUFFIX).as_bytes());
    format!("{:x}", digest)
}

/// Estimated entropy in bits: log2 of the character pool times the length
/// left after discounting repeats and keyboard/alphabet runs.
pub fn entropy_bits(password: &str) -> f64 {
    let pool = pool_size(password);
    if pool == 0 {
        return 0.0;
    }
    (pool as f64).log2() * effective_length(password) as f64
}

/// Rejects common passwords and anything under `min_entropy` bits, naming
/// what would make the password stronger.
pub fn check_strength(password: &str, min_entropy: f64) -> Result<(), String> {
    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err("insecure password, it is too common".to_string());
    }

    if entropy_bits(password) >= min_entropy {
        return Ok(());
    }

    let mut hints = Vec::new();
    if !password.chars().any(is_special) {
        hints.push("including more special characters");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        hints.push("using lowercase letters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        hints.push("using uppercase letters");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        hints.push("including numbers");
    }
    let advice = if hints.is_empty() {
        "using a longer password".to_string()
    } else {
        format!("{} or using a longer password", hints.join(", "))
    };
    Err(format!("insecure password, try {}", advice))
}

fn is_special(c: char) -> bool {
    c.is_ascii_punctuation() || c == ' '
}

fn pool_size(password: &str) -> usize {
    let mut pool = 0;
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        pool += 26;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        pool += 26;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        pool += 10;
    }
    if password.chars().any(is_special) {
        pool += 33;
    }

    let mut others: Vec<char> = password
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !is_special(*c))
        .collect();
    others.sort_unstable();
    others.dedup();

    pool + others.len()
}

fn effective_length(password: &str) -> usize {
    let chars: Vec<char> = password.chars().map(|c| c.to_ascii_lowercase()).collect();
    let mut length = 0;
    let mut repeat_run = 0;
    let mut sequence_run = 0;

    for (i, &c) in chars.iter().enumerate() {
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };

        repeat_run = match prev {
            Some(p) if p == c => repeat_run + 1,
            _ => 0,
        };
        sequence_run = match prev {
            Some(p) if follows_in_sequence(p, c) => sequence_run + 1,
            _ => 0,
        };

        if repeat_run < 2 && sequence_run < 2 {
            length += 1;
        }
    }

    length
}

fn follows_in_sequence(prev: char, next: char) -> bool {
    SEQUENCES.iter().any(|seq| {
        let mut chars = seq.chars();
        while let Some(c) = chars.next() {
            if c == prev {
                return chars.next() == Some(next);
            }
        }
        false
    })
}
