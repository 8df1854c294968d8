pub mod advisor;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod enrichment;
pub mod errors;
pub mod flows;
pub mod recommend;

pub use advisor::Advisor;
pub use catalog::{
    CatalogCache, CatalogCacheSettings, CatalogError, CatalogSource, EnrichedCatalog,
    StaticCatalogSource,
};
pub use domain::item::{
    DayPart, EnrichedItem, ItemId, Nutrition, RawCatalogItem, TasteDimension, TasteProfile,
    Temperature,
};
pub use domain::session::SessionId;
pub use enrichment::Enricher;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{
    FlowGraph, FlowNavigator, GraphError, GraphStatus, NavigationError, NavigatorState,
    StepOutcome,
};
pub use recommend::{
    PreferenceQuery, RawPreferenceQuery, Recommendation, RecommendationSource, Recommender,
    ResultResolver,
};
