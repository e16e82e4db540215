use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipient contact record carried on shipping documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
}

impl Partner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            street: None,
            street2: None,
            zip: None,
            city: None,
            phone: None,
            mobile: None,
        }
    }

    /// Preferred contact number for delivery notifications, mobile first
    pub fn contact_number(&self) -> Option<&str> {
        self.mobile.as_deref().or(self.phone.as_deref())
    }

    /// Split the full name into (first name, last name) for label exports.
    /// The first whitespace-separated token is the first name, the
    /// remainder is the last name.
    pub fn split_name(&self) -> (String, String) {
        match self.name.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (self.name.clone(), String::new()),
        }
    }

    /// Street lines joined into a single address string
    pub fn full_address(&self) -> String {
        [self.street.as_deref(), self.street2.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        let mut partner = Partner::new("Amine El Fassi");
        assert_eq!(
            partner.split_name(),
            ("Amine".to_string(), "El Fassi".to_string())
        );

        partner.name = "Mononym".to_string();
        assert_eq!(partner.split_name(), ("Mononym".to_string(), String::new()));
    }

    #[test]
    fn test_full_address_skips_empty_lines() {
        let mut partner = Partner::new("Test");
        partner.street = Some("12 Rue des Orangers".to_string());
        partner.street2 = Some(String::new());
        assert_eq!(partner.full_address(), "12 Rue des Orangers");

        partner.street2 = Some("Appt 4".to_string());
        assert_eq!(partner.full_address(), "12 Rue des Orangers, Appt 4");
    }

    #[test]
    fn test_contact_number_prefers_mobile() {
        let mut partner = Partner::new("Test");
        partner.phone = Some("0522000000".to_string());
        assert_eq!(partner.contact_number(), Some("0522000000"));

        partner.mobile = Some("0661000000".to_string());
        assert_eq!(partner.contact_number(), Some("0661000000"));
    }
}
