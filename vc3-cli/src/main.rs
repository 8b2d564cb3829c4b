//! VC3 command-line client
//!
//! Defines, stores and queries entities in a VC3 information service.
//!
//! Usage:
//!   vc3 --config client.toml user-create alice --first Alice --last A \
//!       --email a@x.org --institution Inst
//!   vc3 project-add-user p1 alice
//!
//! Every command prints its result as JSON on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;
use vc3_client::{AccessFlavor, AccessMethod, ClientConfig, ResourceType, Vc3Client};

#[derive(Parser, Debug)]
#[command(name = "vc3")]
#[command(about = "VC3 information service client")]
struct Args {
    /// Path to the client config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Information service URL, overriding the config file
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Define and store a user
    UserCreate {
        name: String,
        #[arg(long)]
        first: String,
        #[arg(long)]
        last: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        institution: String,
    },
    /// List all users
    UserList,
    /// Show one user
    UserGet { name: String },

    /// Define and store a project
    ProjectCreate {
        name: String,
        #[arg(long)]
        owner: String,
        /// Initial members, comma separated
        #[arg(long, value_delimiter = ',')]
        members: Vec<String>,
    },
    /// List all projects
    ProjectList,
    /// Show one project
    ProjectGet { name: String },
    /// Add an existing user to an existing project
    ProjectAddUser { project: String, user: String },

    /// Define and store a resource
    ResourceCreate {
        name: String,
        #[arg(long)]
        owner: String,
        #[arg(long = "type")]
        resource_type: ResourceType,
        #[arg(long = "access-method")]
        access_method: AccessMethod,
        #[arg(long = "access-flavor")]
        access_flavor: AccessFlavor,
        /// Address of the resource's gatekeeper or login node
        #[arg(long)]
        address: String,
        /// Require multi-factor authentication
        #[arg(long)]
        mfa: bool,
    },
    /// List all resources
    ResourceList,
    /// Show one resource
    ResourceGet { name: String },

    /// Allocate a resource to a user
    AllocationCreate {
        user: String,
        resource: String,
        #[arg(long = "type", default_value = "unlimited")]
        allocation_type: String,
    },
    /// List all allocations
    AllocationList,
    /// Assign an existing allocation to an existing project
    ProjectAddAllocation { allocation: String, project: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(&args)?;
    debug!(endpoint = %config.store.endpoint, "using information service");
    let client = Vc3Client::from_config(&config).context("failed to create client")?;

    run(&client, args.command).await
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = &args.endpoint {
        config.store.endpoint = endpoint.clone();
    }
    Ok(config)
}

async fn run(client: &Vc3Client, command: Command) -> Result<()> {
    match command {
        Command::UserCreate {
            name,
            first,
            last,
            email,
            institution,
        } => {
            let user = client.define_user(&name, &first, &last, &email, &institution)?;
            client.store_user(&user).await?;
            print_json(&user)
        }
        Command::UserList => print_json(&client.list_users().await?),
        Command::UserGet { name } => print_json(&client.get_user(&name).await?),

        Command::ProjectCreate {
            name,
            owner,
            members,
        } => {
            let members: Vec<&str> = members.iter().map(String::as_str).collect();
            let project = client.define_project(&name, &owner, &members)?;
            client.store_project(&project).await?;
            print_json(&project)
        }
        Command::ProjectList => print_json(&client.list_projects().await?),
        Command::ProjectGet { name } => print_json(&client.get_project(&name).await?),
        Command::ProjectAddUser { project, user } => {
            print_json(&client.add_user_to_project(&project, &user).await?)
        }

        Command::ResourceCreate {
            name,
            owner,
            resource_type,
            access_method,
            access_flavor,
            address,
            mfa,
        } => {
            let resource = client
                .define_resource(&name, &owner, resource_type, access_method, access_flavor, &address)?
                .with_mfa(mfa);
            client.store_resource(&resource).await?;
            print_json(&resource)
        }
        Command::ResourceList => print_json(&client.list_resources().await?),
        Command::ResourceGet { name } => print_json(&client.get_resource(&name).await?),

        Command::AllocationCreate {
            user,
            resource,
            allocation_type,
        } => {
            let allocation = client.define_allocation(&user, &resource, &allocation_type)?;
            client.store_allocation(&allocation).await?;
            print_json(&allocation)
        }
        Command::AllocationList => print_json(&client.list_allocations().await?),
        Command::ProjectAddAllocation {
            allocation,
            project,
        } => print_json(&client.add_allocation_to_project(&allocation, &project).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_resource_create() {
        let args = Args::try_parse_from([
            "vc3",
            "--endpoint",
            "http://info:20334",
            "resource-create",
            "uchicago-rcc",
            "--owner",
            "alice",
            "--type",
            "remote-batch",
            "--access-method",
            "ssh",
            "--access-flavor",
            "slurm",
            "--address",
            "midway.rcc.uchicago.edu",
        ])
        .unwrap();

        match args.command {
            Command::ResourceCreate {
                resource_type,
                access_flavor,
                mfa,
                ..
            } => {
                assert_eq!(resource_type, ResourceType::RemoteBatch);
                assert_eq!(access_flavor, AccessFlavor::Slurm);
                assert!(!mfa);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn members_are_comma_separated() {
        let args = Args::try_parse_from([
            "vc3",
            "project-create",
            "p1",
            "--owner",
            "alice",
            "--members",
            "alice,bob",
        ])
        .unwrap();
        match args.command {
            Command::ProjectCreate { members, .. } => assert_eq!(members, vec!["alice", "bob"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn endpoint_flag_overrides_config() {
        let args = Args::try_parse_from(["vc3", "--endpoint", "http://other:1", "user-list"]).unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.store.endpoint, "http://other:1");
    }
}
