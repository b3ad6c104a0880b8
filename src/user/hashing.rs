//! Password hashing

use anyhow::Result;

mod mixtape_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{
            rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        },
        Argon2,
    };

    pub fn generate_b64_salt() -> String {
        SaltString::generate(&mut OsRng).to_string()
    }

    pub fn hash<T: AsRef<str>>(plain: &[u8], b64_salt: T) -> Result<String> {
        let argon2 = Argon2::default();
        let salt = SaltString::from_b64(b64_salt.as_ref()).map_err(|err| anyhow!("{}", err))?;
        let hash_string = argon2
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string();
        Ok(hash_string)
    }

    pub fn verify<T: AsRef<str>>(plain_pw: &[u8], target_hash: T) -> Result<bool> {
        let argon2 = Argon2::default();
        let password_hash =
            PasswordHash::new(target_hash.as_ref()).map_err(|err| anyhow!("{}", err))?;
        Ok(argon2.verify_password(plain_pw, &password_hash).is_ok())
    }
}

/// The hash scheme applied to registered users' passwords. The produced hash
/// string carries its own salt, so a record stores a single opaque value.
#[derive(Clone, Copy, Debug)]
pub enum MixtapeHasher {
    Argon2,
}

impl MixtapeHasher {
    pub fn generate_b64_salt(&self) -> String {
        match self {
            MixtapeHasher::Argon2 => mixtape_argon2::generate_b64_salt(),
        }
    }

    pub fn hash<T: AsRef<str>>(&self, plain: &[u8], b64_salt: T) -> Result<String> {
        match self {
            MixtapeHasher::Argon2 => mixtape_argon2::hash(plain, b64_salt),
        }
    }

    pub fn verify<T: AsRef<str>>(&self, plain_pw: T, target_hash: T) -> Result<bool> {
        match self {
            MixtapeHasher::Argon2 => {
                mixtape_argon2::verify(plain_pw.as_ref().as_bytes(), target_hash)
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn argon2_hash() {
        let pw = "123mypw";
        let b64_salt = MixtapeHasher::Argon2.generate_b64_salt();

        let hash1 = MixtapeHasher::Argon2
            .hash(pw.as_bytes(), &b64_salt)
            .unwrap();

        let hash2 = MixtapeHasher::Argon2.hash(b"123mypw", &b64_salt).unwrap();
        assert_eq!(hash1, hash2);

        assert!(MixtapeHasher::Argon2.verify("123mypw", &hash1).unwrap());
        assert!(!MixtapeHasher::Argon2.verify("not the pw", &hash1).unwrap());
    }
}
