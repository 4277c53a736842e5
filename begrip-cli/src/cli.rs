use crate::commands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "begrip",
    version,
    about = "Genereert, valideert en beheert beleidsmatige definities voor overheidsgebruik"
)]
pub struct Cli {
    /// Pad naar de SQLite database.
    #[arg(long, global = true, default_value = "data/begrip.db")]
    pub database: String,

    /// Pad naar het YAML-configuratiebestand.
    #[arg(long, global = true, default_value = "config/synonyms.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Genereer een definitie voor een begrip.
    Generate {
        /// Het te definiëren begrip.
        term: String,
        /// Organisatorische context(en), bijv. DJI.
        #[arg(long = "org")]
        organizational: Vec<String>,
        /// Juridische context(en), bijv. Strafrecht.
        #[arg(long = "juridisch")]
        juridical: Vec<String>,
        /// Wettelijke basis, bijv. 'Wetboek van Strafrecht'.
        #[arg(long = "basis")]
        legal_basis: Vec<String>,
        /// Ontologische categorie: proces, type, resultaat of exemplaar.
        #[arg(long)]
        category: Option<String>,
        /// Actor die de generatie uitvoert.
        #[arg(long, default_value = "cli")]
        actor: String,
        /// Forceer opslag bij een bestaand duplicaat (nieuwe versie).
        #[arg(long)]
        force_duplicate: bool,
    },

    /// Classificeer een term en definitie volgens UFO/OntoUML.
    Classify {
        term: String,
        definition: String,
        /// Juridisch domein: strafrecht, bestuursrecht, civiel_recht of
        /// algemeen_juridisch.
        #[arg(long)]
        domain: Option<String>,
    },

    /// Toon synoniemen voor een term.
    Synonyms {
        term: String,
        /// Toon ook ai_pending leden (pragmatic governance).
        #[arg(long)]
        pragmatic: bool,
    },

    /// Controleer het configuratiebestand.
    ConfigCheck,

    /// Toon opslagstatistieken.
    Stats,
}

impl Cli {
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            Commands::Generate {
                term,
                organizational,
                juridical,
                legal_basis,
                category,
                actor,
                force_duplicate,
            } => {
                commands::generate(
                    &self.database,
                    &self.config,
                    term,
                    organizational,
                    juridical,
                    legal_basis,
                    category.as_deref(),
                    actor,
                    *force_duplicate,
                )
                .await
            }
            Commands::Classify {
                term,
                definition,
                domain,
            } => commands::classify(term, definition, domain.as_deref()),
            Commands::Synonyms { term, pragmatic } => {
                commands::synonyms(&self.database, term, *pragmatic).await
            }
            Commands::ConfigCheck => commands::config_check(&self.config),
            Commands::Stats => commands::stats(&self.database).await,
        }
    }
}
