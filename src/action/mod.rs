use std::process::ExitCode;

mod call;
mod schema;

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// Executes one operation described by a request file
    Call(call::Action),
    /// Prints the schema of the provider, its resources and data sources
    Schema(schema::Action),
}

impl Action {
    pub(crate) async fn execute(self) -> ExitCode {
        match self {
            Self::Call(inner) => inner.execute().await,
            Self::Schema(inner) => inner.execute(),
        }
    }
}
