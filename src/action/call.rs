use sparkpost_provider::service::configuration::{Configuration, ProviderBlock};
use sparkpost_provider::{Diagnostic, Error, Provider, Request, Response};
use std::io::Read;
use std::process::ExitCode;

#[derive(Debug, serde::Deserialize)]
struct Input {
    #[serde(default)]
    provider: ProviderBlock,
    request: Request,
}

#[derive(clap::Parser)]
pub(crate) struct Action {
    /// Path to the request file, `-` reads it from stdin.
    #[clap(short, long, default_value = "-")]
    pub input: String,
    /// Path to an optional provider configuration file.
    #[clap(short, long, env = "SPARKPOST_PROVIDER_CONFIG")]
    pub config_path: Option<String>,
    /// Pretty prints the response.
    #[clap(short, long)]
    pub pretty: bool,
}

impl Action {
    fn read_input(&self) -> Result<Input, String> {
        let content = match self.input.as_str() {
            "-" => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .map(|_| buffer)
            }
            path => std::fs::read_to_string(path),
        };
        let content = content.map_err(|err| format!("unable to read {}: {err}", self.input))?;
        serde_json::from_str(&content).map_err(|err| format!("invalid request: {err}"))
    }

    async fn respond(&self, input: Input) -> Response {
        let provider = Configuration::load(&input.provider, self.config_path.as_deref())
            .map_err(Error::from)
            .and_then(|configuration| Provider::configure(&configuration));
        match provider {
            Ok(provider) => provider.handle(input.request).await,
            Err(err) => {
                tracing::error!("unable to configure provider: {}", err);
                Response {
                    diagnostics: vec![Diagnostic::from(&err)],
                    ..Default::default()
                }
            }
        }
    }

    pub(crate) async fn execute(self) -> ExitCode {
        let response = match self.read_input() {
            Ok(input) => self.respond(input).await,
            Err(message) => Response {
                diagnostics: vec![Diagnostic::error("Invalid request", message)],
                ..Default::default()
            },
        };
        let output = if self.pretty {
            serde_json::to_string_pretty(&response)
        } else {
            serde_json::to_string(&response)
        };
        match output {
            Ok(value) => println!("{value}"),
            Err(err) => {
                tracing::error!("unable to serialize response: {:?}", err);
                return ExitCode::FAILURE;
            }
        }
        if response.is_error() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}
