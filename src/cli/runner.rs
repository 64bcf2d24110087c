//! CLI runner - executes commands

use crate::aggregator::PaginationAggregator;
use crate::cancel::CancelSignal;
use crate::cli::commands::{Cli, Commands, FetchArgs, OutputFormat};
use crate::config::{load_job, JobConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::types::Interaction;
use std::time::Duration;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => self.fetch(args).await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load the job file, if one was given
    fn load_job(&self) -> Result<Option<JobConfig>> {
        self.cli
            .job
            .as_ref()
            .map(|path| load_job(path).with_context(|| format!("loading {}", path.display())))
            .transpose()
    }

    /// Validate a job file
    fn validate(&self) -> Result<()> {
        let job = self
            .load_job()?
            .ok_or_else(|| Error::config("Job file not specified (use -j flag)"))?;

        job.validate()?;
        println!("Job is valid: {}", job.url);
        Ok(())
    }

    /// Fetch every page described by the job and flags
    async fn fetch(&self, args: &FetchArgs) -> Result<()> {
        let job = merge_job(self.load_job()?.unwrap_or_default(), args)?;
        job.validate()?;

        let format = self.cli.format;
        let mut config = job.into_aggregator_config(HttpClient::new()?);

        config.consumers.push(Box::new(
            move |batch: &[Interaction]| -> anyhow::Result<()> {
                for interaction in batch {
                    print_interaction(interaction, format)?;
                }
                Ok(())
            },
        ));

        if let Some(secs) = args.deadline {
            config.cancel = Some(CancelSignal::with_timeout(Duration::from_secs(secs)));
        }

        let mut aggregator = PaginationAggregator::new(config)?;
        let results = aggregator.get().await?;

        let failed = results.iter().filter(|i| i.is_error()).count();
        tracing::info!("Fetched {} pages ({} failed)", results.len(), failed);
        Ok(())
    }
}

/// Apply inline flags on top of a job file
pub fn merge_job(mut job: JobConfig, args: &FetchArgs) -> Result<JobConfig> {
    if let Some(url) = &args.url {
        job.url.clone_from(url);
    }

    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        job.headers.insert(name, value);
    }

    job.start = args.start.or(job.start);
    job.boundary = args.boundary.or(job.boundary);
    job.boundary_field = args.boundary_field.clone().or(job.boundary_field);
    job.concurrency = args.concurrency.or(job.concurrency);
    job.timeout_secs = args.timeout.or(job.timeout_secs);
    job.delay_secs = args.delay.or(job.delay_secs);
    job.offset_page_size = args.offset_page_size.or(job.offset_page_size);
    job.ordered |= args.ordered;

    Ok(job)
}

/// Parse a `Name: value` header flag
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| Error::invalid_value("header", format!("expected 'Name: value', got '{raw}'")))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_value("header", "header name is empty"));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

/// Print one interaction to stdout
fn print_interaction(interaction: &Interaction, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(interaction)?),
        OutputFormat::Pretty => {
            let response = &interaction.response;
            match &response.error {
                Some(error) => println!(
                    "[{}] {} {} - error: {}",
                    interaction.page(),
                    response.status,
                    response.status_text,
                    error
                ),
                None => println!(
                    "[{}] {} {} - {} bytes",
                    interaction.page(),
                    response.status,
                    response.status_text,
                    response.data.len()
                ),
            }
        }
    }
    Ok(())
}
