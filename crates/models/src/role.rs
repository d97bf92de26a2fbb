use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// What a user is allowed to see
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Sees every branch
    Admin,
    /// Sees only the records of their own branch
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

#[cfg(feature = "database")]
impl_string_column!(Role);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trips_through_its_name() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::from_str("employee").unwrap(), Role::Employee);
        assert!(Role::from_str("Manager").is_err());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Employee.is_admin());
    }
}
