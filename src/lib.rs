pub mod controller;
pub mod errors;
pub mod i18n;
pub mod models;
pub mod nested;
pub mod redirect;
pub mod repository;
pub mod resource;
pub mod routes;
pub mod validation;
pub mod view;

pub use controller::{Collaborators, FormConfig, FormController};
pub use errors::ResourceError;
pub use models::{FormData, RequestContext};
pub use nested::NestedResourceController;
pub use redirect::{ActionRouter, Flash, FlashRedirect, RedirectTarget, StoreRedirect};
pub use repository::{QueryOp, ResourceRepository};
pub use resource::{ResourceController, ScaffoldController};
pub use routes::ScaffoldState;
pub use validation::FieldRule;
pub use view::{ViewData, ViewRenderer};
