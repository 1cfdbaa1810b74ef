pub mod error;
pub mod io;
pub mod math;
pub mod model;
pub mod risk;
pub mod trend;

pub use error::{LeptoError, LeptoResult};
pub use model::seiwr::{simulate, CompartmentState, SeiwrConfig, SeiwrModel, Trajectory};
pub use trend::{predict, HistoryRecord, ModelSource, PredictionModel, PredictionResult};
