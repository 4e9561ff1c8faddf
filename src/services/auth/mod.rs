pub mod backend;
pub mod classifier;
pub mod cookie;
pub mod decision;
pub mod factory;
pub mod gate;
pub mod remote;

pub use backend::{AuthBackend, BackendError, BackendResult, RefreshedTokens};
pub use classifier::{PathClass, PathClassifier};
pub use cookie::{ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, SessionCookies, TokenPair};
pub use decision::{DenyReason, GateDecision, IncomingRequest, RETURN_TO_PARAM};
pub use factory::{GATE_ENDPOINTS, build_token_gate, session_cookies};
pub use gate::TokenGate;
pub use remote::RemoteAuthBackend;
