pub mod access;
pub mod domain;
pub mod ports;
pub mod session;
pub mod upload;

pub use access::{authorize, landing_route, navigation_for, Access, NavItem, Navigation, Route};
pub use domain::{
    AnalysisKind, AnalysisRecord, Claims, Dataset, DatasetFilter, DatasetStatus, DnaMatch,
    NewDataset, PublicUser, Role, Session, SpeciesPrediction, TaxonomyTree, User,
};
pub use ports::{
    AnalysisLog, DatasetRepository, DnaMatcher, PortError, PortResult, SessionStorage,
    SpeciesClassifier, UserRepository,
};
pub use session::{MemorySessionStorage, SessionStore};
pub use upload::{UploadFile, UploadForm, UploadRequest};
