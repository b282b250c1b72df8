use sparkpost_provider::Provider;
use std::process::ExitCode;

#[derive(clap::Parser)]
pub(crate) struct Action {
    /// Pretty prints the schema.
    #[clap(short, long)]
    pub pretty: bool,
}

impl Action {
    pub(crate) fn execute(&self) -> ExitCode {
        let schema = Provider::schema();
        let output = if self.pretty {
            serde_json::to_string_pretty(&schema)
        } else {
            serde_json::to_string(&schema)
        };
        match output {
            Ok(value) => {
                println!("{value}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                tracing::error!("unable to serialize schema: {:?}", err);
                ExitCode::FAILURE
            }
        }
    }
}
