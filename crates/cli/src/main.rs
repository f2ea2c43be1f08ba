use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use odonto_core::{
    Arch, Author, ChartId, ChartStore, ConditionCatalog, CoreConfig, EditorConfig, ToothChart,
    ToothNumber, DEFAULT_CARE_LOCATION, DEFAULT_DATA_DIR,
};

#[derive(Parser)]
#[command(name = "odonto")]
#[command(about = "Odonto tooth chart CLI")]
struct Cli {
    /// Chart storage root (overrides ODONTO_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Identity written to the commit of every change.
#[derive(Args)]
struct AuthorArgs {
    /// Author name for Git commit
    #[arg(long, default_value = "Odonto CLI")]
    author_name: String,
    /// Author role for Git commit
    #[arg(long, default_value = "Dentist")]
    author_role: String,
    /// Author email for Git commit
    #[arg(long, default_value = "cli@odonto.local")]
    author_email: String,
}

impl AuthorArgs {
    fn author(&self) -> anyhow::Result<Author> {
        Ok(Author::new(
            &self.author_name,
            &self.author_role,
            &self.author_email,
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the condition catalog in legend order
    Conditions,
    /// Create an empty chart
    Create {
        #[command(flatten)]
        author: AuthorArgs,
    },
    /// List all charts
    List,
    /// Print a chart, upper arch then lower arch
    Show {
        /// Chart identifier
        chart_id: String,
    },
    /// Set the condition of one tooth
    SetCondition {
        /// Chart identifier
        chart_id: String,
        /// FDI tooth number
        tooth: ToothNumber,
        /// Condition identifier (see `odonto conditions`)
        condition: String,
        #[command(flatten)]
        author: AuthorArgs,
    },
    /// Replace the notes of one tooth
    SetNotes {
        /// Chart identifier
        chart_id: String,
        /// FDI tooth number
        tooth: ToothNumber,
        /// Notes text
        notes: String,
        #[command(flatten)]
        author: AuthorArgs,
    },
    /// Show stored revisions, newest first
    History {
        /// Chart identifier
        chart_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("odonto_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| {
        std::env::var("ODONTO_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.into())
            .into()
    });
    let care_location =
        std::env::var("ODONTO_CARE_LOCATION").unwrap_or_else(|_| DEFAULT_CARE_LOCATION.into());
    let store = ChartStore::new(Arc::new(CoreConfig::new(data_dir, care_location)?));

    match cli.command {
        Some(Commands::Conditions) => {
            for condition in ConditionCatalog::list() {
                println!(
                    "{:<12} {:<12} {}",
                    condition.as_str(),
                    condition.label(),
                    condition.colour()
                );
            }
        }
        Some(Commands::Create { author }) => {
            let chart_id = store.create(&author.author()?)?;
            println!("Created chart with ID: {}", chart_id);
        }
        Some(Commands::List) => {
            let charts = store.list();
            if charts.is_empty() {
                println!("No charts found.");
            } else {
                for chart_id in charts {
                    println!("{}", chart_id);
                }
            }
        }
        Some(Commands::Show { chart_id }) => {
            let chart_id = ChartId::parse(&chart_id)?;
            let chart = store.load(chart_id)?;
            print_arch(&chart, Arch::Upper);
            print_arch(&chart, Arch::Lower);
        }
        Some(Commands::SetCondition {
            chart_id,
            tooth,
            condition,
            author,
        }) => {
            let chart_id = ChartId::parse(&chart_id)?;
            let mut editor = store.editor(chart_id, author.author()?, EditorConfig::editable())?;
            editor.apply_condition(tooth, &condition)?;
            if let Some(e) = editor.into_listener().take_error() {
                return Err(e.into());
            }
            println!("Tooth {} set to {}", tooth, condition);
        }
        Some(Commands::SetNotes {
            chart_id,
            tooth,
            notes,
            author,
        }) => {
            let chart_id = ChartId::parse(&chart_id)?;
            let mut editor = store.editor(chart_id, author.author()?, EditorConfig::editable())?;
            editor.select_tooth(tooth);
            editor.edit_notes(notes);
            editor.commit_notes();
            if let Some(e) = editor.into_listener().take_error() {
                return Err(e.into());
            }
            println!("Notes updated for tooth {}", tooth);
        }
        Some(Commands::History { chart_id }) => {
            let chart_id = ChartId::parse(&chart_id)?;
            for rev in store.history(chart_id)? {
                println!(
                    "{}  {}  {}  ({})",
                    &rev.commit_id[..rev.commit_id.len().min(8)],
                    rev.committed_at.to_rfc3339(),
                    rev.summary,
                    rev.author_name
                );
            }
        }
        None => {
            println!("Use 'odonto --help' for commands");
        }
    }

    Ok(())
}

fn print_arch(chart: &ToothChart, arch: Arch) {
    let heading = match arch {
        Arch::Upper => "Upper arch",
        Arch::Lower => "Lower arch",
    };
    println!("{heading}");
    for tooth in ToothNumber::arch_teeth(arch) {
        let record = chart.get_record(tooth);
        if record.notes.is_empty() {
            println!("  {:>2}  {}", tooth.get(), record.condition.label());
        } else {
            println!(
                "  {:>2}  {:<12} {}",
                tooth.get(),
                record.condition.label(),
                record.notes
            );
        }
    }
}
