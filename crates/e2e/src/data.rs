//! Test data shared by the suites

use serde::{Deserialize, Serialize};

/// Credentials and names of a shop customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            email: "yaqa.demoshop@example.com".to_string(),
            password: "Yaqa123456!".to_string(),
            first_name: "Yaroslav".to_string(),
            last_name: "Yaqa".to_string(),
        }
    }
}

impl TestUser {
    /// A user with a never-registered email, keeping the default names
    pub fn unique() -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            email: format!("yaqa.{}@example.com", &suffix[..12]),
            ..Self::default()
        }
    }
}

/// A catalog product of the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
}

pub const SIMPLE_COMPUTER: Product = Product {
    id: 75,
    name: "Simple Computer",
};

pub const LAPTOP: Product = Product {
    id: 31,
    name: "14.1-inch Laptop",
};

/// Look up a product fixture by key
pub fn product(key: &str) -> Option<Product> {
    match key {
        "simple_computer" => Some(SIMPLE_COMPUTER),
        "laptop" => Some(LAPTOP),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_users_differ_only_by_email() {
        let a = TestUser::unique();
        let b = TestUser::unique();
        assert_ne!(a.email, b.email);
        assert_eq!(a.first_name, b.first_name);
        assert!(a.email.ends_with("@example.com"));
    }

    #[test]
    fn test_product_lookup() {
        assert_eq!(product("laptop"), Some(LAPTOP));
        assert_eq!(product("simple_computer").map(|p| p.id), Some(75));
        assert!(product("phone").is_none());
    }
}
