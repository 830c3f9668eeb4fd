//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{auth, browse, contact, list, records, stats};

/// Browse and administer Examupdt content from the terminal.
#[derive(Parser, Debug)]
#[command(name = "examupdt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the Examupdt service
    #[arg(
        long,
        env = "EXAMUPDT_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    pub service_url: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in as an admin and remember the session
    Login(auth::LoginArgs),

    /// End the stored session
    Logout,

    /// Show the signed-in admin
    Whoami,

    /// Browse the public site's listings
    Browse(browse::BrowseArgs),

    /// List a collection with search, filters, sorting and paging
    List(list::ListArgs),

    /// Show one record
    Show(records::ShowArgs),

    /// Create a record from a JSON file
    Create(records::CreateArgs),

    /// Update fields of a record
    Update(records::UpdateArgs),

    /// Delete one record
    Delete(records::DeleteArgs),

    /// Delete several records at once
    BulkDelete(records::BulkDeleteArgs),

    /// Contact form messages
    Contact(contact::ContactCommand),

    /// Dashboard statistics
    Stats,
}
