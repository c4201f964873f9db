#![allow(dead_code)]

use crate::areas::repository::Repository;
use crate::artifacts::merge::MergeOutcome;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod areas;
mod artifacts;
mod commands;

#[derive(Parser)]
#[command(
    name = "minigit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal distributed version control system",
    long_about = "This is a minimal version control system, written in Rust. \
    It records snapshots of a working tree as content-addressed objects, \
    arranges them into a branching history, and reconciles divergent \
    histories with a three-way merge.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the raw content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file as a blob and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(
            short,
            long,
            required = false,
            help = "Write the object to the object database"
        )]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "add",
        about = "Add files or directories to the index",
        long_about = "This command adds the specified files or directories to the index. \
        It requires the paths of the files or directories to be specified."
    )]
    Add {
        #[arg(index = 1, help = "The files or directories to add to the index")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command shows the commit history of the current branch, newest first."
    )]
    Log,
    #[command(
        name = "branch",
        about = "Create, delete, or list branches",
        long_about = "This command manages branches: create a branch at the current HEAD, \
        delete an existing branch, or list all branches."
    )]
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },
    #[command(
        name = "checkout",
        about = "Switch to another branch",
        long_about = "This command switches the working tree and index to the snapshot \
        of the specified branch and makes it the current branch."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to")]
        target: String,
    },
    #[command(
        name = "merge",
        about = "Merge another branch into the current one",
        long_about = "This command merges the specified branch into the current branch \
        using a three-way merge against their common ancestor."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge into the current one")]
        target: String,
        #[arg(short, long, help = "The merge commit message")]
        message: Option<String>,
    },
}

#[derive(Subcommand)]
enum BranchCommands {
    #[command(name = "create", about = "Create a branch at the current HEAD")]
    Create {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: String,
    },
    #[command(name = "delete", about = "Delete a branch")]
    Delete {
        #[arg(index = 1, help = "The name of the branch to delete")]
        name: String,
    },
    #[command(name = "list", about = "List all branches")]
    List,
}

fn repository_at_current_dir() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(pwd, Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::new(path.into(), Box::new(std::io::stdout()))?,
                None => repository_at_current_dir()?,
            };

            repository.init()?
        }
        Commands::CatFile { sha } => {
            let mut repository = repository_at_current_dir()?;

            repository.cat_file(sha)?
        }
        Commands::HashObject { write, file } => {
            let mut repository = repository_at_current_dir()?;

            repository.hash_object(file, *write)?
        }
        Commands::Add { paths } => {
            let mut repository = repository_at_current_dir()?;

            repository.add(paths)?
        }
        Commands::Commit { message } => {
            let mut repository = repository_at_current_dir()?;

            repository.commit(message)?
        }
        Commands::Log => {
            let repository = repository_at_current_dir()?;

            repository.log()?
        }
        Commands::Branch { command } => {
            let mut repository = repository_at_current_dir()?;

            match command {
                BranchCommands::Create { name } => repository.branch_create(name)?,
                BranchCommands::Delete { name } => repository.branch_delete(name)?,
                BranchCommands::List => repository.branch_list()?,
            }
        }
        Commands::Checkout { target } => {
            let mut repository = repository_at_current_dir()?;

            repository.checkout(target)?
        }
        Commands::Merge { target, message } => {
            let mut repository = repository_at_current_dir()?;

            let outcome = repository.merge(target, message.as_deref())?;
            if matches!(outcome, MergeOutcome::Conflicted(_)) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
