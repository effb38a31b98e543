use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use fittrack::authz::{AuthzEngine, Principal};

#[derive(Parser, Debug)]
#[command(author, version, about = "fittrack authorization inspection tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List roles and the permission codes they grant
    Roles,
    /// List the permission catalog grouped by category
    Permissions,
    /// Show how a policy name resolves
    Resolve { name: String },
    /// Evaluate a policy against a synthetic claim set; exits non-zero on deny
    Check {
        name: String,
        /// Role claims to present
        #[arg(long = "role")]
        roles: Vec<String>,
        /// Permission claims to present
        #[arg(long = "permission")]
        permissions: Vec<String>,
        /// Evaluate as an unauthenticated caller
        #[arg(long)]
        anonymous: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let engine = AuthzEngine::standard();

    match cli.command {
        Commands::Roles => {
            for role in engine.table().roles() {
                println!("{}", role);
                for code in engine.table().permissions_for_role(role) {
                    println!("  {}", code);
                }
            }
        }
        Commands::Permissions => {
            for (category, codes) in engine.catalog().groups() {
                println!("{}", category);
                for code in codes {
                    println!("  {}", code);
                }
            }
        }
        Commands::Resolve { name } => {
            let resolved = engine.resolve(&name);
            println!("source: {}", resolved.source.label());
            println!("spec:   {}", resolved.spec);
        }
        Commands::Check {
            name,
            roles,
            permissions,
            anonymous,
        } => {
            let principal = if anonymous {
                Principal::anonymous()
            } else {
                Principal::authenticated(Uuid::new_v4())
            }
            .with_roles(roles)
            .with_permissions(permissions);

            let result = engine.authorize(&principal, &name);
            if result.succeeded {
                println!("allowed: {}", name);
            } else {
                println!("denied: {}", name);
                for requirement in &result.failed_requirements {
                    println!("  failed: {}", requirement);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
