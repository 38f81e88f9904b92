//! Client configuration
//!
//! Everything is read from the environment once at startup. `from_lookup`
//! takes the variable source as a closure so tests don't touch the process
//! environment.

use crate::identity::Principal;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:4943/api";
pub const DEFAULT_IDENTITY_PROVIDER: &str = "https://identity.ic0.app/#authorize";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported locale: {0} (expected \"en\" or \"es\")")]
    UnknownLocale(String),
    #[error("Invalid port: {0}")]
    InvalidPort(String),
    #[error("Category list is empty")]
    EmptyCategories,
}

/// Language of the fixed user-facing strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    Spanish,
}

impl Locale {
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        match tag.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "es" | "spanish" | "español" => Ok(Locale::Spanish),
            other => Err(ConfigError::UnknownLocale(other.to_string())),
        }
    }

    pub fn chat_copy(self) -> ChatCopy {
        match self {
            Locale::English => ChatCopy {
                greeting: "I'm your Tourism 3.0 assistant. How can I help you?".to_string(),
                placeholder: "Thinking...".to_string(),
                failure: "An error occurred, please try again.".to_string(),
            },
            Locale::Spanish => ChatCopy {
                greeting: "Soy tu asistente de Turismo 3.0. ¿En qué puedo ayudarte?".to_string(),
                placeholder: "Thinking...".to_string(),
                failure: "Ocurrió un error, intenta nuevamente.".to_string(),
            },
        }
    }

    pub fn listing_copy(self) -> ListingCopy {
        match self {
            Locale::English => ListingCopy {
                missing_fields: "Please complete all fields.".to_string(),
                invalid_price: "The price must be a number.".to_string(),
                create_failed: "Error creating the tour.".to_string(),
                reservation_stub: "Reservation made for tour ID {id} (feature under construction)."
                    .to_string(),
                review_stub: "Reviews for tour ID {id} are under construction.".to_string(),
            },
            Locale::Spanish => ListingCopy {
                missing_fields: "Por favor, completa todos los campos.".to_string(),
                invalid_price: "El precio debe ser un número.".to_string(),
                create_failed: "Error al crear el tour.".to_string(),
                reservation_stub:
                    "Reserva realizada para el tour ID {id} (funcionalidad en construcción)."
                        .to_string(),
                review_stub: "Funcionalidad de reseñas para el tour ID {id} en construcción."
                    .to_string(),
            },
        }
    }

    pub fn default_categories(self) -> CategoryOptions {
        let names: &[&str] = match self {
            Locale::English => &[
                "Hotels",
                "Flights",
                "Transport",
                "Restaurants",
                "Museums",
                "Tourist Sites",
            ],
            Locale::Spanish => &[
                "Hoteles",
                "Aviones",
                "Transporte",
                "Restaurantes",
                "Museos",
                "Lugares Turísticos",
            ],
        };
        CategoryOptions::new(names.iter().map(ToString::to_string))
    }
}

/// Fixed strings shown by the assistant panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCopy {
    pub greeting: String,
    pub placeholder: String,
    pub failure: String,
}

/// Fixed strings surfaced by the listing form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCopy {
    pub missing_fields: String,
    pub invalid_price: String,
    pub create_failed: String,
    /// `{id}` is replaced with the tour id
    pub reservation_stub: String,
    /// `{id}` is replaced with the tour id
    pub review_stub: String,
}

impl ListingCopy {
    pub fn reservation_notice(&self, id: u64) -> String {
        self.reservation_stub.replace("{id}", &id.to_string())
    }

    pub fn review_notice(&self, id: u64) -> String {
        self.review_stub.replace("{id}", &id.to_string())
    }
}

/// The enumerated category names a draft may select from, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryOptions(Vec<String>);

impl CategoryOptions {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut options: Vec<String> = Vec::new();
        for name in names {
            let name = name.trim().to_string();
            if !name.is_empty() && !options.contains(&name) {
                options.push(name);
            }
        }
        Self(options)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|option| option == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Startup configuration for the client host
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub identity_provider: String,
    pub port: u16,
    pub locale: Locale,
    pub categories: CategoryOptions,
    /// Principal of a session that already exists when the client starts
    pub session_principal: Option<Principal>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let locale = match lookup("TRAVELCHAIN_LOCALE") {
            Some(tag) => Locale::parse(&tag)?,
            None => Locale::default(),
        };

        let port = match lookup("TRAVELCHAIN_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let categories = match lookup("TRAVELCHAIN_CATEGORIES") {
            Some(raw) => {
                let options = CategoryOptions::new(raw.split(',').map(str::to_string));
                if options.is_empty() {
                    return Err(ConfigError::EmptyCategories);
                }
                options
            }
            None => locale.default_categories(),
        };

        let session_principal = lookup("TRAVELCHAIN_PRINCIPAL")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(Principal::new);

        Ok(Self {
            backend_url: lookup("TRAVELCHAIN_BACKEND_URL")
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            identity_provider: lookup("TRAVELCHAIN_IDENTITY_PROVIDER")
                .unwrap_or_else(|| DEFAULT_IDENTITY_PROVIDER.to_string()),
            port,
            locale,
            categories,
            session_principal,
        })
    }
}
