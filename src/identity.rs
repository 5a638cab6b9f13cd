use actix_web::dev::Payload;
use actix_web::error::{ErrorForbidden, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpRequest};
use futures::future::{Ready, ready};
use strum_macros::EnumString;

use crate::model::review::Reviewer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CallerRole {
    Admin,
    Employee,
}

/// Identity asserted by the gateway in request headers. The upstream proxy
/// has already authenticated the caller; this service only reads the result.
///
/// `X-Employee-Id` is required. `X-Employee-Name` falls back to the id and
/// `X-Employee-Role` to `employee` when absent.
#[derive(Debug, Clone)]
pub struct Caller {
    pub employee_id: String,
    pub name: String,
    pub role: CallerRole,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == CallerRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ErrorForbidden("Admin role required"))
        }
    }

    pub fn reviewer(&self) -> Reviewer {
        Reviewer {
            id: self.employee_id.clone(),
            name: self.name.clone(),
        }
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = match header(req, "X-Employee-Id").map(str::trim) {
            Some(id) if !id.is_empty() => {
                let employee_id = id.to_string();
                let name = header(req, "X-Employee-Name")
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| employee_id.clone());
                let role = header(req, "X-Employee-Role")
                    .and_then(|role| role.trim().parse().ok())
                    .unwrap_or(CallerRole::Employee);
                Ok(Caller {
                    employee_id,
                    name,
                    role,
                })
            }
            _ => Err(ErrorUnauthorized("Missing X-Employee-Id header")),
        };
        ready(resolved)
    }
}
