use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "docgen")]
#[command(about = "Project documentation generation service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen port
        #[arg(short, long, env = "PORT", default_value_t = 8003)]
        port: u16,

        /// Listen address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// List the supported document types
    Types,

    /// Print the section structure of a document type as JSON
    Structure {
        /// Document type key, e.g. SPRINT_REPORT
        document_type: String,
    },

    /// Fetch project context and print the generation prompt without calling the model
    Prompt {
        /// Document type key, e.g. SRS
        document_type: String,

        /// Project identifier on the project backend
        #[arg(long)]
        project: String,

        /// Sprint to detail in the prompt
        #[arg(long)]
        sprint: Option<String>,

        /// Free-text focus areas for the document
        #[arg(long)]
        requirements: Option<String>,

        /// Bearer token forwarded to the project backend
        #[arg(long, env = "DOC_AGENT_BACKEND_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve() {
        let cli = Cli::try_parse_from(["docgen", "serve", "--port", "9000", "--host", "127.0.0.1"])
            .unwrap();
        assert_eq!(cli.command, Commands::Serve { port: 9000, host: "127.0.0.1".into() });
    }

    #[test]
    fn parses_prompt() {
        let cli = Cli::try_parse_from([
            "docgen",
            "prompt",
            "SPRINT_REPORT",
            "--project",
            "p1",
            "--sprint",
            "s2",
        ])
        .unwrap();
        match cli.command {
            Commands::Prompt { document_type, project, sprint, requirements, .. } => {
                assert_eq!(document_type, "SPRINT_REPORT");
                assert_eq!(project, "p1");
                assert_eq!(sprint.as_deref(), Some("s2"));
                assert!(requirements.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn prompt_requires_project() {
        assert!(Cli::try_parse_from(["docgen", "prompt", "SRS"]).is_err());
    }

    #[test]
    fn parses_structure() {
        let cli = Cli::try_parse_from(["docgen", "structure", "test_plan"]).unwrap();
        assert_eq!(cli.command, Commands::Structure { document_type: "test_plan".into() });
    }
}
