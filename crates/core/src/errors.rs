use thiserror::Error;

use crate::catalog::CatalogError;
use crate::flows::{GraphError, NavigationError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<GraphError> for ApplicationError {
    fn from(value: GraphError) -> Self {
        Self::Domain(DomainError::Graph(value))
    }
}

impl From<NavigationError> for ApplicationError {
    fn from(value: NavigationError) -> Self {
        Self::Domain(DomainError::Navigation(value))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "That choice isn't available here. Pick another option.",
            Self::ServiceUnavailable { .. } => {
                "The menu is still loading, so no recommendations are available yet."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let unassigned = || "unassigned".to_owned();
        match value {
            ApplicationError::Domain(DomainError::Navigation(error)) => {
                Self::BadRequest { message: error.to_string(), correlation_id: unassigned() }
            }
            // A broken decision tree is an authoring defect, not caller input.
            ApplicationError::Domain(DomainError::Graph(error)) => {
                Self::Internal { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Catalog(error) => {
                Self::ServiceUnavailable { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id: unassigned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::CatalogError;
    use crate::errors::{ApplicationError, DomainError, InterfaceError};
    use crate::flows::{GraphError, NavigationError};

    #[test]
    fn navigation_error_maps_to_bad_request_with_correlation_id() {
        let interface = ApplicationError::from(NavigationError::AtRoot).into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(
            interface.user_message(),
            "That choice isn't available here. Pick another option."
        );
    }

    #[test]
    fn catalog_unavailable_maps_to_service_unavailable() {
        let interface = ApplicationError::from(CatalogError::Unavailable {
            attempts: 3,
            last_error: "connection refused".to_owned(),
        })
        .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The menu is still loading, so no recommendations are available yet."
        );
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn invalid_graph_maps_to_internal() {
        let interface =
            ApplicationError::from(GraphError::MissingStart("start".to_owned())).into_interface("req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
    }

    #[test]
    fn persistence_failure_maps_to_service_unavailable() {
        let persistence =
            ApplicationError::Persistence("database lock timeout".to_owned()).into_interface("req-4");
        assert!(matches!(persistence, InterfaceError::ServiceUnavailable { .. }));

        let already_completed =
            ApplicationError::from(DomainError::Navigation(NavigationError::AlreadyCompleted))
                .into_interface("req-5");
        assert!(matches!(already_completed, InterfaceError::BadRequest { .. }));
    }
}
