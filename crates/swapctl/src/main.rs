//! swapctl - command-line front end for the skill exchange
//!
//! Opens the exchange over the configured JSON collection files and runs
//! one action per invocation on behalf of `--actor`.

mod render;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use clap::{Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use std::path::{Path, PathBuf};
use swap_core::config::PROJECT_CONFIG_PATH;
use swap_core::report::write_report;
use swap_core::{
    Actor, Config, Exchange, Id, JsonFileStore, NewMember, ProfileUpdate, ReportKind, SwapStatus,
};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Browse members and trade skills from the terminal.
#[derive(Parser)]
#[command(name = "swapctl")]
#[command(about = "Skill exchange directory and swap ledger")]
#[command(version)]
struct Cli {
    /// Config file path (overrides .skillswap/config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding members.json and requests.json
    #[arg(long, global = true, env = "SWAPCTL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Member id to act as
    #[arg(long, global = true, env = "SWAPCTL_ACTOR")]
    actor: Option<String>,

    /// Act with administrator rights
    #[arg(long, global = true, env = "SWAPCTL_ADMIN")]
    admin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search public members by skill (all public members when omitted)
    Search {
        /// Case-insensitive skill keyword
        keyword: Option<String>,

        /// Only members with this exact availability tag (e.g. Weekends)
        #[arg(long)]
        availability: Option<String>,
    },

    /// Show a member profile
    Show {
        /// Member ID
        member_id: String,
    },

    /// Register a new member profile
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        photo: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// Skills offered (repeat or comma-separate)
        #[arg(long = "offer", value_delimiter = ',')]
        offers: Vec<String>,

        /// Skills wanted (repeat or comma-separate)
        #[arg(long = "want", value_delimiter = ',')]
        wants: Vec<String>,

        /// Availability slots such as Weekends or Evenings
        #[arg(long, value_delimiter = ',')]
        availability: Vec<String>,

        /// Keep the profile out of search results
        #[arg(long)]
        hidden: bool,
    },

    /// Edit the acting member's own profile
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        photo: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// Replace skills offered
        #[arg(long = "offer", value_delimiter = ',')]
        offers: Option<Vec<String>>,

        /// Replace skills wanted
        #[arg(long = "want", value_delimiter = ',')]
        wants: Option<Vec<String>>,

        /// Replace availability slots
        #[arg(long, value_delimiter = ',')]
        availability: Option<Vec<String>>,

        /// Show the profile in search results
        #[arg(long, conflicts_with = "hidden")]
        public: bool,

        /// Hide the profile from search results
        #[arg(long)]
        hidden: bool,
    },

    /// Hide a member from search (admin)
    Ban {
        /// Member ID
        member_id: String,
    },

    /// Make a hidden member searchable again (admin)
    Unban {
        /// Member ID
        member_id: String,
    },

    /// Propose a swap to another member
    Request {
        /// Receiver member ID
        receiver_id: String,

        /// Skill you offer
        #[arg(long)]
        offer: String,

        /// Skill you want in return
        #[arg(long)]
        want: String,

        #[arg(long, default_value = "")]
        message: String,
    },

    /// List swap requests received and sent by the acting member
    Requests {
        /// Filter by status (pending, accepted, rejected, completed)
        #[arg(long, value_parser = parse_status)]
        status: Option<SwapStatus>,
    },

    /// Accept a pending request you received
    Accept {
        /// Request ID
        request_id: String,
    },

    /// Reject a pending request you received
    Reject {
        /// Request ID
        request_id: String,
    },

    /// Withdraw a pending request you sent
    Cancel {
        /// Request ID
        request_id: String,
    },

    /// Mark an accepted swap as completed
    Complete {
        /// Request ID
        request_id: String,

        /// Rating from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        #[arg(long)]
        feedback: Option<String>,
    },

    /// Export a JSON report (admin)
    Export {
        /// Report: members, swaps, or activity
        #[arg(value_parser = parse_report_kind)]
        kind: ReportKind,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_status(s: &str) -> Result<SwapStatus, String> {
    s.parse()
}

fn parse_report_kind(s: &str) -> Result<ReportKind, String> {
    s.parse()
}

fn main() {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().wrap_err("failed to read working directory")?;
    let config = load_config(&cwd, cli.config.as_deref(), cli.data_dir)?;
    debug!(
        members = %config.members_file.display(),
        requests = %config.requests_file.display(),
        "opening exchange"
    );
    let mut exchange = Exchange::open(config.json_store(), &config)
        .wrap_err_with(|| format!("failed to open exchange in {}", config.data_dir.display()))?;

    let actor = cli.actor.map(|id| Actor {
        member_id: Id::from_string(id),
        is_admin: cli.admin,
    });

    match cli.command {
        Command::Search {
            keyword,
            availability,
        } => {
            let viewer = actor.as_ref().map(|a| &a.member_id);
            let members = exchange.discover(keyword.as_deref(), availability.as_deref(), viewer);
            render::print_member_list(&members);
        }
        Command::Show { member_id } => {
            let member = exchange.member(&Id::from_string(member_id))?;
            render::print_member_details(member);
        }
        Command::Register {
            name,
            email,
            location,
            photo,
            bio,
            offers,
            wants,
            availability,
            hidden,
        } => {
            let member = exchange.register(NewMember {
                name,
                email,
                location,
                profile_photo: photo,
                skills_offered: offers,
                skills_wanted: wants,
                availability,
                is_public: Some(!hidden),
                bio,
            })?;
            render::print_member_registered(&member);
        }
        Command::Profile {
            name,
            location,
            photo,
            bio,
            offers,
            wants,
            availability,
            public,
            hidden,
        } => {
            let actor = require_actor(actor)?;
            let is_public = if public {
                Some(true)
            } else if hidden {
                Some(false)
            } else {
                None
            };
            let update = ProfileUpdate {
                name,
                location,
                profile_photo: photo,
                bio,
                skills_offered: offers,
                skills_wanted: wants,
                availability,
                is_public,
            };
            let member = exchange.update_profile(&actor, &actor.member_id, update)?;
            println!("Profile {} updated", member.id);
        }
        Command::Ban { member_id } => {
            set_visibility(&mut exchange, actor, &member_id, false)?;
        }
        Command::Unban { member_id } => {
            set_visibility(&mut exchange, actor, &member_id, true)?;
        }
        Command::Request {
            receiver_id,
            offer,
            want,
            message,
        } => {
            let actor = require_actor(actor)?;
            let request = exchange.create_request(
                &actor,
                &Id::from_string(receiver_id),
                &offer,
                &want,
                &message,
            )?;
            render::print_request_created(&request);
        }
        Command::Requests { status } => {
            let actor = require_actor(actor)?;
            let mut listing = exchange.requests_for(&actor.member_id);
            if let Some(status) = status {
                listing.received.retain(|r| r.status == status);
                listing.sent.retain(|r| r.status == status);
            }
            render::print_request_listing(&listing);
        }
        Command::Accept { request_id } => {
            let actor = require_actor(actor)?;
            let request = exchange.accept(&actor, &Id::from_string(request_id))?;
            render::print_request_updated(&request);
        }
        Command::Reject { request_id } => {
            let actor = require_actor(actor)?;
            let request = exchange.reject(&actor, &Id::from_string(request_id))?;
            render::print_request_updated(&request);
        }
        Command::Cancel { request_id } => {
            let actor = require_actor(actor)?;
            let request = exchange.cancel(&actor, &Id::from_string(request_id))?;
            println!("Request {} canceled", request.id);
        }
        Command::Complete {
            request_id,
            rating,
            feedback,
        } => {
            let actor = require_actor(actor)?;
            let request =
                exchange.complete(&actor, &Id::from_string(request_id), rating, feedback)?;
            render::print_request_updated(&request);
        }
        Command::Export { kind, output } => {
            let actor = require_actor(actor)?;
            let content = exchange.export(&actor, kind)?;
            match output {
                Some(path) => {
                    write_report(&path, &content)
                        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
                    println!("Wrote {} report to {}", kind.as_str(), path.display());
                }
                None => println!("{content}"),
            }
        }
    }
    Ok(())
}

/// Defaults, then `.skillswap/config`, then `--config`, then flags.
fn load_config(
    cwd: &Path,
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Result<Config> {
    let mut config = Config::default();

    let project_config = cwd.join(PROJECT_CONFIG_PATH);
    if project_config.exists() {
        config
            .load_file(&project_config)
            .wrap_err_with(|| format!("failed to load {}", project_config.display()))?;
    }
    if let Some(path) = config_path {
        config
            .load_file(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?;
    }
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }

    config.resolve_paths(cwd);
    Ok(config)
}

fn require_actor(actor: Option<Actor>) -> Result<Actor> {
    actor.ok_or_else(|| eyre!("this command needs --actor <MEMBER_ID> (or SWAPCTL_ACTOR)"))
}

fn set_visibility(
    exchange: &mut Exchange<JsonFileStore>,
    actor: Option<Actor>,
    member_id: &str,
    public: bool,
) -> Result<()> {
    let actor = require_actor(actor)?;
    let member_id = Id::from(member_id);
    let changed = exchange.set_visibility(&actor, &member_id, public)?;
    let state = if public { "visible" } else { "hidden" };
    if changed {
        println!("Member {member_id} is now {state}");
    } else {
        println!("Member {member_id} was already {state}");
    }
    Ok(())
}
