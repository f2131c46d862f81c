use anyhow::Result;
use clap::{Parser, Subcommand};
use qchain_core::Chain;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "qchain-cli")]
#[command(about = "Local demo and client for the quantum-linked chain")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a chain locally, append transfer blocks, and probe tampering
    Demo {
        /// Proof-of-work difficulty
        #[arg(long, default_value_t = 2)]
        difficulty: usize,
    },
    /// Fetch chain statistics from a running node
    Info {
        /// Node base URL (e.g. http://127.0.0.1:8080)
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        node: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo { difficulty } => run_demo(difficulty)?,
        Command::Info { node } => {
            let client = reqwest::Client::new();
            let res = client.get(format!("{node}/chain/info")).send().await?;
            let status = res.status();
            let body = res.text().await?;
            println!("status: {}", status);
            println!("{body}");
        }
    }
    Ok(())
}

fn run_demo(difficulty: usize) -> Result<()> {
    let mut chain = Chain::new(difficulty)?;
    println!(
        "created chain with {} block(s) at difficulty {}",
        chain.blocks.len(),
        chain.difficulty
    );

    let transfers = [
        "Alice transfers 100 quantum tokens to Bob",
        "Bob transfers 50 quantum tokens to Charlie",
        "Charlie transfers 25 quantum tokens to David",
    ];
    for (i, transfer) in transfers.iter().enumerate() {
        chain.append(*transfer)?;
        let verdict = if chain.verify_block(i + 1) {
            "verified"
        } else {
            "FAILED verification"
        };
        println!("block {} {verdict}: {transfer}", i + 1);
    }

    let info = chain.info()?;
    println!(
        "length: {}  valid: {}  total entanglement: {:.8}  average: {:.8}",
        info.chain_length, info.is_valid, info.total_entanglement, info.average_entanglement
    );

    // Out-of-band tampering is visible to validate() and reversible.
    let original = chain.blocks[1].data.clone();
    chain.blocks[1].data = "TAMPERED DATA".to_string();
    println!("validity after tampering: {}", chain.validate()?);
    chain.blocks[1].data = original;
    println!("validity after restore: {}", chain.validate()?);

    Ok(())
}
