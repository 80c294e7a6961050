//! Star and rank rule lookups

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted};
use crate::progress::ProgressTracker;
use crate::scoring::{Rank, Stars, stars_for_accuracy, stars_for_attempts, stars_for_rhythm};

#[derive(Subcommand, Debug)]
pub enum ScoreCommands {
    /// Stars for a capacitor balance accuracy
    Accuracy {
        /// Accuracy in percent (0-100)
        percent: u32,
    },

    /// Stars for a diode puzzle solved in this many rotations
    Attempts { count: u32 },

    /// Stars for an inductor rhythm game with this many hits
    Rhythm { hits: u32 },

    /// Final rank for a star total
    Rank { total: u32 },
}

#[derive(Debug, Serialize)]
struct StarResult {
    rule: &'static str,
    input: u32,
    stars: Stars,
}

#[derive(Debug, Serialize)]
struct RankResult {
    total_stars: u32,
    max_stars: u32,
    rank: Rank,
    title: &'static str,
}

pub fn run(command: ScoreCommands, format: OutputFormat) -> Result<()> {
    match command {
        ScoreCommands::Accuracy { percent } => {
            if percent > 100 {
                anyhow::bail!("Accuracy is a percentage, got {}", percent);
            }
            print_stars(star_result("accuracy", percent, stars_for_accuracy), format);
        }
        ScoreCommands::Attempts { count } => {
            print_stars(star_result("attempts", count, stars_for_attempts), format)
        }
        ScoreCommands::Rhythm { hits } => {
            print_stars(star_result("rhythm", hits, stars_for_rhythm), format)
        }
        ScoreCommands::Rank { total } => {
            let result = rank_result(total)?;
            print_formatted(&result, format, |r| {
                format!("{} / {} stars: {}", r.total_stars, r.max_stars, r.rank)
            });
        }
    }
    Ok(())
}

fn star_result(rule: &'static str, input: u32, score: fn(u32) -> Stars) -> StarResult {
    StarResult {
        rule,
        input,
        stars: score(input),
    }
}

fn rank_result(total: u32) -> Result<RankResult> {
    let max_stars = ProgressTracker::new().max_stars();
    if total > max_stars {
        anyhow::bail!("A session holds at most {} stars, got {}", max_stars, total);
    }
    let rank = Rank::for_total(total);
    Ok(RankResult {
        total_stars: total,
        max_stars,
        rank,
        title: rank.name(),
    })
}

fn print_stars(result: StarResult, format: OutputFormat) {
    print_formatted(&result, format, |r| {
        format!("{} {} -> {} ({})", r.rule, r.input, r.stars, r.stars.get())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_rules() {
        assert_eq!(star_result("accuracy", 95, stars_for_accuracy).stars, Stars::THREE);
        assert_eq!(star_result("accuracy", 69, stars_for_accuracy).stars, Stars::ONE);
        assert_eq!(star_result("attempts", 3, stars_for_attempts).stars, Stars::TWO);
        assert_eq!(star_result("rhythm", 8, stars_for_rhythm).stars, Stars::THREE);
    }

    #[test]
    fn test_rank_bounds() {
        assert_eq!(rank_result(12).unwrap().rank, Rank::MasterEngineer);
        assert_eq!(rank_result(4).unwrap().title, "Electron Rookie");
        assert!(rank_result(13).is_err());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(star_result("rhythm", 5, stars_for_rhythm)).unwrap();
        assert_eq!(json["stars"], 2);
        assert_eq!(json["rule"], "rhythm");
    }
}
