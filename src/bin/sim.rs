use connect_four::{AiPlayer, GameStatus, InMemoryTransport, PlayerNode, Role, Session};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 && args.len() != 4 {
        eprintln!("Usage: {} <seed1> <seed2> [rematches]", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    let rematches: u32 = match args.get(3) {
        Some(n) => n.parse()?,
        None => 0,
    };

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    let (t1, t2) = InMemoryTransport::pair();

    let f1 = async move {
        let mut node = PlayerNode::new(
            Box::new(AiPlayer::with_rematches(rematches)),
            Session::new(Role::Initiator, Box::new(t1)),
        );
        let summary = node.run(&mut rng1).await?;
        Ok::<_, anyhow::Error>((summary, node.session().board().turn()))
    };

    let f2 = async move {
        let mut node = PlayerNode::new(
            Box::new(AiPlayer::with_rematches(rematches)),
            Session::new(Role::Responder, Box::new(t2)),
        );
        let summary = node.run(&mut rng2).await?;
        Ok::<_, anyhow::Error>((summary, node.session().board().turn()))
    };

    let ((s1, turn1), (s2, _)) = tokio::try_join!(f1, f2)?;

    let last = s1.results.last().copied();
    let winner = match last {
        Some(GameStatus::LocalWin) => Some("initiator"),
        Some(GameStatus::RemoteWin) => Some("responder"),
        _ => None,
    };

    let result = json!({
        "initiator": s1,
        "responder": s2,
        "games": s1.results.len(),
        "last_game_turns": turn1,
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
