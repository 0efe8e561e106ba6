// Application layer - Use case interactors

pub mod container;
pub mod inspect_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectInteractor, InspectRequest, InspectResponse, OutputFormat};
