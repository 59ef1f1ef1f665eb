use serde_json::Value;

use super::{required, Dto, DtoResult};

/// Credentials for a password login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginDto {
    email: String,
    password: String,
}

impl LoginDto {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Dto for LoginDto {
    fn create(props: &Value) -> DtoResult<Self> {
        Ok(Self {
            email: required(props, "email")?,
            password: required(props, "password")?,
        })
    }
}

/// Session to terminate.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoutDto {
    access_token: String,
}

impl LogoutDto {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl Dto for LogoutDto {
    fn create(props: &Value) -> DtoResult<Self> {
        Ok(Self {
            access_token: required(props, "accessToken")?,
        })
    }
}

/// New identity plus the profile names stored alongside it.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterDto {
    email: String,
    password: String,
    name: String,
    lastname: String,
}

impl RegisterDto {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }
}

impl Dto for RegisterDto {
    fn create(props: &Value) -> DtoResult<Self> {
        Ok(Self {
            email: required(props, "email")?,
            password: required(props, "password")?,
            name: required(props, "name")?,
            lastname: required(props, "lastname")?,
        })
    }
}

// Credentials never reach logs.
macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* } secret { $($secret:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    $(.field(stringify!($secret), &"[REDACTED]"))*
                    .finish()
            }
        }
    };
}

redacted_debug!(LoginDto { email } secret { password });
redacted_debug!(LogoutDto {} secret { access_token });
redacted_debug!(RegisterDto { email, name, lastname } secret { password });
