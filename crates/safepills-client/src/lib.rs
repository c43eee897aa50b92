//! SafePills client.
//!
//! Async side of the self-assessment tool: talks to the SafePills API and
//! drives the pure engines from `safepills-core`.
//!
//! ```text
//! keystrokes ──▶ SearchWidget ──(debounce)──▶ ApiClient::search
//!                     │ select
//!                     ▼
//!            QuestionnaireSession ──▶ ApiClient::flow / evaluate
//!                     │
//!                     ▼
//!               AnalysisResult ──▶ ScoreView
//!
//! SelectionStore ──▶ InteractionAnalyzer ──▶ ApiClient::analyze
//! ```
//!
//! # Modules
//!
//! - [`api`]: backend traits and the reqwest implementation
//! - [`config`]: environment and command-line configuration
//! - [`debounce`]: cancellable timers
//! - [`search`]: search-as-you-type widget
//! - [`session`]: unified and legacy questionnaire sessions
//! - [`analysis`]: drug-drug interaction analysis
//! - [`prompt`]: terminal question rendering and answer parsing

pub mod analysis;
pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod prompt;
pub mod search;
pub mod session;

pub use analysis::{AnalysisOutcome, InteractionAnalyzer};
pub use api::{ApiClient, AutomedicationBackend, InteractionBackend, SearchBackend};
pub use config::ClientConfig;
pub use debounce::{schedule_after, Debouncer, TimerHandle};
pub use error::{ClientError, ClientResult};
pub use search::{SearchSnapshot, SearchWidget};
pub use session::{LegacyEvent, LegacyQuizSession, QuestionnaireSession, SessionEvent};
