use clap::{Args, Parser, Subcommand};
use pageant_api::types::{ContestantInput, EventInput, PasswordResetDoneInput, VoteInput};

#[derive(Parser, Debug)]
pub enum Command {
    /// Log in and keep the session for later commands.
    Login(LoginArgs),
    /// Create an organizer account.
    Register(RegisterArgs),
    /// Confirm an account's email address.
    VerifyEmail(VerifyEmailArgs),
    /// Ask for a password reset link.
    ResetPassword(ResetPasswordArgs),
    /// Set a new password with the token from a reset link.
    CompleteReset(CompleteResetArgs),
    /// Blacklist the refresh token and forget the session.
    Logout,
    /// Refresh the access token.
    Refresh,
    /// Show the user of the stored session.
    Whoami,
    /// Get the organizer's profile.
    Profile,
    /// List the organizer's events.
    Events(EventsArgs),
    /// Get an event with its categories and contestants.
    Event(EventIdArgs),
    /// Create a new event.
    CreateEvent(EventFieldsArgs),
    /// Change some fields of an event.
    UpdateEvent(UpdateEventArgs),
    /// Make an event visible to voters.
    Publish(EventIdArgs),
    /// Delete an event.
    DeleteEvent(EventIdArgs),
    /// Manage the categories of an event.
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage the contestants of an event.
    #[command(subcommand)]
    Contestant(ContestantCommand),
    /// List published events.
    PublicEvents,
    /// Get a published event.
    PublicEvent(EventIdArgs),
    /// Search published events.
    Search(SearchArgs),
    /// Get the results of an event.
    Results(WatchEventArgs),
    /// Vote for a contestant.
    Vote(VoteArgs),
    /// Read the analytics of an event.
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub(crate) username: String,
    #[arg(short, long)]
    pub(crate) password: String,
}

#[derive(Parser, Debug)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub(crate) username: String,
    #[arg(short, long)]
    pub(crate) email: String,
    /// Phone number, with country code
    #[arg(long)]
    pub(crate) phone: String,
    #[arg(short, long)]
    pub(crate) password: String,
    /// Repeat the password
    #[arg(long)]
    pub(crate) confirm_password: String,
}

#[derive(Parser, Debug)]
pub struct VerifyEmailArgs {
    /// Token from the verification link
    pub(crate) token: String,
}

#[derive(Parser, Debug)]
pub struct ResetPasswordArgs {
    #[arg(short, long)]
    pub(crate) email: String,
}

#[derive(Parser, Debug)]
pub struct CompleteResetArgs {
    /// Token from the reset link
    #[arg(short, long)]
    pub(crate) token: String,
    #[arg(short, long)]
    pub(crate) password: String,
    /// Repeat the password
    #[arg(long)]
    pub(crate) confirm_password: String,
}

impl From<CompleteResetArgs> for PasswordResetDoneInput {
    fn from(args: CompleteResetArgs) -> Self {
        Self { token: args.token, password: args.password, confirm_password: args.confirm_password }
    }
}

#[derive(Parser, Debug)]
pub struct EventsArgs {
    /// Only events which are not published yet
    #[arg(long)]
    pub(crate) unpublished: bool,
}

#[derive(Parser, Debug)]
pub struct EventIdArgs {
    #[arg(short, long)]
    pub(crate) event_id: u64,
}

#[derive(Args, Debug)]
pub struct EventFieldsArgs {
    #[arg(short, long)]
    pub(crate) name: Option<String>,
    #[arg(short, long)]
    pub(crate) bio: Option<String>,
    /// Price of a single vote
    #[arg(short, long)]
    pub(crate) amount_per_vote: Option<f64>,
    /// RFC 3339 timestamp, e.g. 2026-11-01T18:00:00Z
    #[arg(long)]
    pub(crate) start_time: Option<String>,
    #[arg(long)]
    pub(crate) end_time: Option<String>,
}

impl From<EventFieldsArgs> for EventInput {
    fn from(args: EventFieldsArgs) -> Self {
        Self {
            name: args.name,
            bio: args.bio,
            amount_per_vote: args.amount_per_vote,
            start_time: args.start_time,
            end_time: args.end_time,
        }
    }
}

#[derive(Parser, Debug)]
pub struct UpdateEventArgs {
    #[arg(short, long)]
    pub(crate) event_id: u64,
    #[command(flatten)]
    pub(crate) fields: EventFieldsArgs,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Add {
        #[arg(short, long)]
        event_id: u64,
        #[arg(short, long)]
        name: String,
    },
    Update {
        #[arg(short, long)]
        event_id: u64,
        #[arg(short, long)]
        category_id: u64,
        #[arg(short, long)]
        name: String,
    },
    Delete {
        #[arg(short, long)]
        event_id: u64,
        #[arg(short, long)]
        category_id: u64,
    },
}

#[derive(Args, Debug)]
pub struct ContestantFieldsArgs {
    #[arg(short, long)]
    pub(crate) name: Option<String>,
    #[arg(short, long)]
    pub(crate) bio: Option<String>,
    /// Category the contestant competes in
    #[arg(long)]
    pub(crate) category: Option<u64>,
}

impl From<ContestantFieldsArgs> for ContestantInput {
    fn from(args: ContestantFieldsArgs) -> Self {
        Self { name: args.name, bio: args.bio, category: args.category }
    }
}

#[derive(Subcommand, Debug)]
pub enum ContestantCommand {
    Add {
        #[arg(short, long)]
        event_id: u64,
        #[command(flatten)]
        fields: ContestantFieldsArgs,
    },
    Update {
        #[arg(short, long)]
        event_id: u64,
        #[arg(short, long)]
        contestant_id: u64,
        #[command(flatten)]
        fields: ContestantFieldsArgs,
    },
    Delete {
        #[arg(short, long)]
        event_id: u64,
        #[arg(short, long)]
        contestant_id: u64,
    },
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Event name or tag
    pub(crate) query: String,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Poll again after every interval until interrupted
    #[arg(short, long)]
    pub(crate) watch: bool,
    /// Seconds between polls
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub(crate) interval: u64,
}

#[derive(Parser, Debug)]
pub struct WatchEventArgs {
    #[arg(short, long)]
    pub(crate) event_id: u64,
    #[command(flatten)]
    pub(crate) watch: WatchArgs,
}

#[derive(Parser, Debug)]
pub struct VoteArgs {
    #[arg(short, long)]
    pub(crate) event_id: u64,
    #[arg(short, long)]
    pub(crate) contestant_id: u64,
    /// Receipt address; votes anonymously when omitted
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(
        short = 'n',
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub(crate) votes: u32,
}

impl From<&VoteArgs> for VoteInput {
    fn from(args: &VoteArgs) -> Self {
        Self { voter_email: args.email.clone(), number_of_votes: args.votes }
    }
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsCommand {
    /// Totals, revenue and timelines.
    Dashboard(EventIdArgs),
    /// Current vote counts.
    Live(WatchEventArgs),
    /// Contestants ranked by votes.
    Leaderboard(WatchEventArgs),
}
