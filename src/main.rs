#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use clap::{Args, Parser, ValueEnum};
#[cfg(feature = "std")]
use connect_four::{
    init_logging, AiPlayer, Board, CliPlayer, InMemoryTransport, MatchSummary, Player,
    PlayerNode, Role, Session, SessionOptions, TcpTransport, Transport, DEFAULT_COLS,
    DEFAULT_PORT, DEFAULT_ROWS,
};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::net::TcpListener;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Ai,
}

#[derive(Args, Clone, Debug)]
#[cfg(feature = "std")]
struct GameArgs {
    #[arg(long, value_enum, default_value_t = PlayerType::Human)]
    player: PlayerType,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_ROWS, help = "Board rows; both sides must agree")]
    rows: usize,
    #[arg(long, default_value_t = DEFAULT_COLS, help = "Board columns; both sides must agree")]
    cols: usize,
    #[arg(long, help = "Give up waiting for the opponent after this many seconds")]
    timeout_secs: Option<u64>,
    #[arg(long, default_value_t = 0, help = "Rematches an AI player accepts")]
    rematches: u32,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Watch two AIs play each other on the local machine.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0)]
        rematches: u32,
    },
    /// Listen for an opponent. The host plays O and moves second.
    Host {
        #[arg(long, default_value_t = format!("0.0.0.0:{}", DEFAULT_PORT))]
        bind: String,
        #[command(flatten)]
        game: GameArgs,
    },
    /// Connect to a host. The joining player plays X and moves first.
    Join {
        #[arg(long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
        connect: String,
        #[command(flatten)]
        game: GameArgs,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
fn print_summary(summary: &MatchSummary) {
    println!(
        "\nThank you for playing! Games: {}, won: {}, lost: {}, drawn: {}",
        summary.results.len(),
        summary.wins(),
        summary.losses(),
        summary.draws()
    );
}

#[cfg(feature = "std")]
async fn run_networked(
    role: Role,
    transport: Box<dyn Transport>,
    game: GameArgs,
) -> anyhow::Result<()> {
    if let Some(s) = game.seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }
    let board = Board::with_size(game.rows, game.cols, role.symbol())?;
    let options = SessionOptions {
        recv_timeout: game.timeout_secs.map(Duration::from_secs),
    };
    let session = Session::with_board(role, board, transport).with_options(options);
    let player: Box<dyn Player> = match game.player {
        PlayerType::Human => Box::new(CliPlayer::new()),
        PlayerType::Ai => {
            println!("AI player selected.");
            Box::new(AiPlayer::with_rematches(game.rematches))
        }
    };

    let mut rng = make_rng(game.seed);
    let mut node = PlayerNode::new(player, session);
    match node.run(&mut rng).await {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("Match ended with an error: {}", e);
            print_summary(&node.summary());
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local { seed, rematches } => {
            println!("Starting local AI vs AI game...");
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let mut rng1 = make_rng(seed);
            let mut rng2 = make_rng(seed.map(|s| s.wrapping_add(1)));

            let (t1, t2) = InMemoryTransport::pair();
            let mut initiator = PlayerNode::new(
                Box::new(AiPlayer::with_rematches(rematches)),
                Session::new(Role::Initiator, Box::new(t1)),
            );
            let mut responder = PlayerNode::new(
                Box::new(AiPlayer::with_rematches(rematches)),
                Session::new(Role::Responder, Box::new(t2)),
            );

            let (first, second) = tokio::try_join!(
                initiator.run(&mut rng1),
                responder.run(&mut rng2)
            )?;
            println!("{}", initiator.session().board());
            println!("Initiator (X): {:?}", first.results);
            println!("Responder (O): {:?}", second.results);
        }
        Commands::Host { bind, game } => {
            println!("Starting host at {}...", bind);
            let listener = TcpListener::bind(&bind).await?;
            println!("Waiting for a player to connect...");
            let (stream, addr) = listener.accept().await?;
            stream.set_nodelay(true)?;
            println!("Connected to {}!", addr);
            run_networked(Role::Responder, Box::new(TcpTransport::new(stream)), game).await?;
        }
        Commands::Join { connect, game } => {
            println!("Connecting to {}...", connect);
            let transport = TcpTransport::connect(&connect).await?;
            println!("Connected successfully!");
            run_networked(Role::Initiator, Box::new(transport), game).await?;
        }
    }
    Ok(())
}
