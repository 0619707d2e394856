use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clubdesk_api::activities::ActivitySort;
use clubdesk_api::members::MemberSort;
use clubdesk_core::Theme;
use std::path::PathBuf;

/// Administer a sports club from the terminal.
#[derive(Parser, Debug)]
#[command(name = "clubdesk", version, about)]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, env = "CLUBDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// File holding the session between runs.
    #[arg(
        long,
        env = "CLUBDESK_STORE",
        default_value = ".clubdesk/session.json",
        global = true
    )]
    pub store: PathBuf,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and keep the session.
    Login {
        username: String,
        /// Read from the terminal when omitted.
        #[arg(long, env = "CLUBDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out and forget the session.
    Logout,
    /// Show the logged-in user.
    Whoami {
        /// Ask the backend instead of the cached copy.
        #[arg(long)]
        remote: bool,
    },
    /// List members.
    Members {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        id: Option<i64>,
        /// Order by age.
        #[arg(long, value_enum)]
        sort: Option<Order>,
    },
    /// List activities.
    Activities {
        #[arg(long)]
        search: Option<String>,
        /// Order by capacity.
        #[arg(long, value_enum)]
        sort: Option<Order>,
    },
    /// List enrollments.
    Enrollments,
    /// List subscriptions.
    Subscriptions {
        #[arg(long)]
        member: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// List class sessions.
    Sessions {
        #[arg(long)]
        activity: Option<i64>,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Club statistics.
    Stats,
    /// Weekly class calendar, Monday to Saturday.
    Schedule {
        /// Weeks away from the current one.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        week: i64,
        #[arg(long)]
        activity: Option<i64>,
    },
    /// Show or set the colour theme preference.
    Theme { theme: Option<Theme> },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl From<Order> for MemberSort {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => MemberSort::AgeAsc,
            Order::Desc => MemberSort::AgeDesc,
        }
    }
}

impl From<Order> for ActivitySort {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => ActivitySort::CapacityAsc,
            Order::Desc => ActivitySort::CapacityDesc,
        }
    }
}
