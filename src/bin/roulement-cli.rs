#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use roulement::generator::RANDOM;
use roulement::{
    io, plan, Configuration, Generator, Generators, Member, RandomGen, Request, RngSource,
    ShiftEntry, Shuffle,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de rotations d'astreinte
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(clap::Args, Debug)]
struct Inputs {
    /// Configuration de rotation (JSON)
    #[arg(long)]
    config: String,
    /// Fiches membres (tableau JSON)
    #[arg(long)]
    members: String,
    /// Historique d'occurrences (tableau JSON)
    #[arg(long)]
    history: Option<String>,
    /// Instant de référence RFC3339 (défaut : maintenant)
    #[arg(long)]
    start: Option<String>,
    /// Graine du tirage aléatoire (générateur `Random`)
    #[arg(long)]
    seed: Option<u64>,
    /// Mélange du générateur `Random` : legacy | uniform
    #[arg(long, default_value_t = Shuffle::Uniform)]
    shuffle: Shuffle,
}

#[derive(clap::Args, Debug)]
struct Outputs {
    #[arg(long)]
    out_json: Option<String>,
    #[arg(long)]
    out_csv: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer des occurrences avec le générateur configuré (ou `--generator`)
    Generate {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        outputs: Outputs,
        /// Nombre de cycles (défaut : `shifts_to_schedule` de la configuration)
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        generator: Option<String>,
        /// Modificateur à appliquer (répétable, dans l'ordre) ; remplace les
        /// modificateurs de la configuration, appliqués sinon
        #[arg(long = "modifier")]
        modifiers: Vec<String>,
    },

    /// Planifier comme le ferait la tâche périodique (fenêtre `expiration`)
    Schedule {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        outputs: Outputs,
    },

    /// Lister générateurs et modificateurs disponibles
    List,
}

fn parse_start(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => s
            .parse::<DateTime<Utc>>()
            .with_context(|| format!("invalid --start (RFC3339 expected): {s}")),
        None => Ok(Utc::now()),
    }
}

fn source(seed: Option<u64>) -> RngSource<rand_pcg::Mcg128Xsl64> {
    match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    }
}

/// Charge configuration, membres déclarés et historique.
fn load(inputs: &Inputs) -> Result<(Configuration, Vec<Member>, Vec<ShiftEntry>)> {
    let cfg = io::load_configuration(&inputs.config)?;
    let known = io::load_members(&inputs.members)?;
    let members = plan::resolve_members(&cfg, &known)?;
    let history = match &inputs.history {
        Some(path) => io::load_shifts(path)?,
        None => Vec::new(),
    };
    Ok((cfg, members, history))
}

fn generators(shuffle: Shuffle) -> Generators {
    let mut g = Generators::with_defaults();
    g.register(RANDOM, Generator::Random(RandomGen::new(shuffle)));
    g
}

fn emit(shifts: &[ShiftEntry], outputs: &Outputs) -> Result<()> {
    if let Some(path) = &outputs.out_json {
        io::export_shifts_json(path, shifts)?;
    }
    if let Some(path) = &outputs.out_csv {
        io::export_shifts_csv(path, shifts)?;
    }
    for s in shifts {
        let on_call = s.emails().collect::<Vec<_>>().join(",");
        println!(
            "{} | {} → {} | {}",
            s.name,
            s.start.to_rfc3339(),
            s.end.to_rfc3339(),
            if on_call.is_empty() { "-" } else { on_call.as_str() }
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            inputs,
            outputs,
            count,
            generator,
            modifiers,
        } => {
            let (mut cfg, members, history) = load(&inputs)?;
            if let Some(name) = generator {
                cfg.config.generator = name;
            }
            let start = parse_start(inputs.start.as_deref())?;
            let registry = generators(inputs.shuffle);

            let req = Request::new(&cfg, start, &members)
                .with_previous(&history)
                .with_count(count.unwrap_or(cfg.shifts_to_schedule));
            let shifts = registry
                .fetch(&cfg.config.generator)?
                .generate(&req, &mut source(inputs.seed))?;
            let modifiers = if modifiers.is_empty() {
                &cfg.config.modifiers
            } else {
                &modifiers
            };
            let shifts = registry.apply_modifiers(modifiers, &shifts)?;
            emit(&shifts, &outputs)?;
            0
        }
        Commands::Schedule { inputs, outputs } => {
            let (cfg, members, history) = load(&inputs)?;
            let now = parse_start(inputs.start.as_deref())?;
            let registry = generators(inputs.shuffle);

            let mut rng = source(inputs.seed);
            match plan::schedule_rota(&registry, &cfg, now, &history, &members, &mut rng)? {
                Some(shifts) => {
                    emit(&shifts, &outputs)?;
                    0
                }
                None => {
                    println!("nothing to schedule for {}", cfg.name);
                    // Code 2 = rien à faire
                    2
                }
            }
        }
        Commands::List => {
            let registry = Generators::with_defaults();
            for name in registry.list() {
                println!("generator {name}");
            }
            for name in registry.list_modifiers() {
                println!("modifier {name}");
            }
            0
        }
    };

    std::process::exit(code);
}
