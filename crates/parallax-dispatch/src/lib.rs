pub mod settings;
pub mod router;
pub mod registry;
pub mod dispatcher;
pub mod builder;

pub use settings::ProviderSettings;
pub use router::{route_model, ModelRoute};
pub use registry::{CustomEndpoint, ProviderRegistry, ResolvedModel};
pub use dispatcher::ChatDispatcher;
pub use builder::ChatDispatcherBuilder;
