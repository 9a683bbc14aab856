use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerDetails {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(DomainError::validation("customer email is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::DomainError;

    use super::CustomerDetails;

    #[test]
    fn blank_name_or_email_fails_validation() {
        let missing_name = CustomerDetails {
            name: "  ".to_string(),
            email: "ravi@example.com".to_string(),
            phone: None,
            address: None,
        };
        assert!(matches!(missing_name.validate(), Err(DomainError::Validation(_))));

        let missing_email = CustomerDetails {
            name: "Ravi Traders".to_string(),
            email: String::new(),
            phone: None,
            address: None,
        };
        assert!(matches!(missing_email.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn complete_details_pass_validation() {
        let customer = CustomerDetails {
            name: "Ravi Traders".to_string(),
            email: "ravi@example.com".to_string(),
            phone: Some("+91 98200 00000".to_string()),
            address: Some("Industrial Estate, Pune".to_string()),
        };
        assert!(customer.validate().is_ok());
    }
}
