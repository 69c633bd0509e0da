// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Leaderboard demo: one set of players, two orderings, live updates.

use std::rc::Rc;

use ordex::Linked;
use ordex::Links;
use ordex::Options;
use ordex::OrderedIndex;
use tracing_subscriber::EnvFilter;

struct Player {
    name: String,
    score: u64,
    links: Links<Player>,
}

impl Linked for Player {
    fn links(&self) -> &Links<Player> {
        return &self.links;
    }
}

fn score(player: &Player) -> &u64 {
    return &player.score;
}

fn name(player: &Player) -> &String {
    return &player.name;
}

fn player(name: &str, score: u64) -> Rc<Player> {
    return Rc::new(Player {
        name: name.to_string(),
        score,
        links: Links::new(),
    });
}

fn print_board(title: &str, board: &OrderedIndex<Player, u64>) {
    println!("{}:", title);
    for (rank, p) in board.iter().enumerate() {
        println!("  {:>2}. {:<8} {:>5}", rank + 1, p.name, p.score);
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut players = vec![
        player("ada", 1200),
        player("brook", 950),
        player("cyd", 1200),
        player("dev", 400),
        player("eli", 1710),
    ];

    let mut by_score = OrderedIndex::new(score);
    let mut by_name = match OrderedIndex::with_options(name, Options::seeded(7)) {
        Ok(index) => index,
        Err(err) => {
            eprintln!("bad options: {}", err);
            return;
        }
    };

    for p in &players {
        by_score.insert(p);
        by_name.insert(p);
    }
    print_board("initial", &by_score);

    // Scores are keys, so an update is remove, replace, insert.
    let old = Rc::clone(&players[3]);
    by_score.remove(&old);
    by_name.remove(&old);
    let updated = player(&old.name, 1500);
    by_score.insert(&updated);
    by_name.insert(&updated);
    players[3] = updated;
    print_board("after dev scores 1500", &by_score);

    if let Some(top) = by_score.fetch_last() {
        println!("retiring {} ({})", top.name, top.score);
        by_name.remove(&top);
    }
    print_board("after retiring the leader", &by_score);

    println!("by name, descending:");
    for p in &by_name {
        println!("  {}", p.name);
    }
    println!("{} indexed by name, {} by score", by_name.len(), by_score.len());

    if let Some(p) = by_score.get(&1200) {
        let below = by_score.prev(&p).map(|b| b.name.clone());
        println!("someone at 1200: {} (next down: {:?})", p.name, below);
    }
}
