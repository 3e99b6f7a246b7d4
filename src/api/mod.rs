mod chart_calls;
mod dispatcher;
mod dispatcher_config;
mod figure_builder;
mod outcome;

pub use dispatcher::ChartDispatcher;
pub use dispatcher_config::DispatcherConfig;
pub use outcome::ChartOutcome;
