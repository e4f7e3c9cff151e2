use std::collections::BTreeMap;

use tinyrand::StdRand;
use tinyrand_alloc::Mock;

use super::*;
use crate::cricsheet::InningData;
use crate::testing;

fn artificial_pair() -> [Lineup; 2] {
    [Lineup::artificial("Alpha"), Lineup::artificial("Beta")]
}

fn wickets(inning: &InningData) -> u32 {
    inning
        .overs
        .iter()
        .flat_map(|over| &over.deliveries)
        .map(|delivery| delivery.wickets.len() as u32)
        .sum()
}

fn legal_balls(over: &OverData) -> usize {
    over.deliveries
        .iter()
        .filter(|delivery| delivery.extras.wides.is_none() && delivery.extras.noballs.is_none())
        .count()
}

/// Checks the laws that every simulated inning must obey.
fn assert_inning_laws(inning: &InningData, format: Format) {
    if let Some(limit) = format.overs() {
        assert!(inning.overs.len() <= limit as usize);
    }
    assert!(wickets(inning) <= 10);

    let (last, completed) = inning.overs.split_last().unwrap();
    for over in completed {
        assert_eq!(6, legal_balls(over), "over {} of {}", over.over, inning.team);
    }
    assert!(legal_balls(last) <= 6);

    let mut overs_per_bowler = BTreeMap::<&str, u32>::new();
    for (index, over) in inning.overs.iter().enumerate() {
        assert_eq!(index as u32, over.over);
        let bowler = &over.deliveries[0].bowler;
        assert!(over.deliveries.iter().all(|delivery| &delivery.bowler == bowler));
        *overs_per_bowler.entry(bowler.as_str()).or_default() += 1;
        if let Some(next) = inning.overs.get(index + 1) {
            assert_ne!(bowler, &next.deliveries[0].bowler, "consecutive overs");
        }

        for pair in over.deliveries.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            if !before.wickets.is_empty() {
                assert_eq!(before.non_striker, after.non_striker);
                continue;
            }
            let crossed = before.runs.total % 2 == 1
                && before.extras.wides.is_none()
                && before.extras.noballs.is_none();
            if crossed {
                assert_eq!(before.non_striker, after.batter);
                assert_eq!(before.batter, after.non_striker);
            } else {
                assert_eq!(before.batter, after.batter);
            }
        }
    }
    if let Some(cap) = format.bowler_cap() {
        assert!(overs_per_bowler.values().all(|&overs| overs <= cap), "{overs_per_bowler:?}");
    }
}

#[test]
fn artificial_lineup() {
    let lineup = Lineup::artificial("Alpha");
    lineup.validate().unwrap();
    assert_eq!(11, lineup.players.len());
    assert_eq!("Alpha Player 1", lineup.name(0));
    assert_eq!("Alpha Player 11", lineup.name(10));
    assert_eq!("Player 6", lineup.players[DEFAULT_KEEPER].mobile_name);
    assert_eq!(DEFAULT_KEEPER, lineup.keeper);
}

#[test]
fn lineups_from_match() {
    let data = testing::sample_match_data();
    let [alpha, beta] = Lineup::from_match(&data, Some(&testing::sample_cricinfo())).unwrap();
    assert_eq!("Alpha", alpha.team);
    assert_eq!(DEFAULT_KEEPER, alpha.keeper);
    assert_eq!("Abe Archer", alpha.players[0].known_as);
    assert_eq!("Baker", alpha.players[1].mobile_name);
    assert_eq!(1, beta.keeper);
    assert_eq!("BB Mason", beta.name(1));

    let [_, beta] = Lineup::from_match(&data, None).unwrap();
    assert_eq!(DEFAULT_KEEPER, beta.keeper);

    let mut short = data.clone();
    short.info.players.get_mut("Beta").unwrap().truncate(10);
    assert_eq!(
        Err(SimulationError::IncompleteTeam {
            team: "Beta".into(),
            players: 10
        }),
        Lineup::from_match(&short, None)
    );
}

#[test]
fn reject_invalid_lineups_and_config() {
    let mut lineups = artificial_pair();
    lineups[1].keeper = 11;
    let err = Simulator::default()
        .simulate(&lineups, Format::T20, &mut StdRand::default())
        .unwrap_err();
    assert_eq!(
        SimulationError::InvalidKeeper {
            team: "Beta".into(),
            keeper: 11
        },
        err
    );

    let mut config = Config::default();
    config.middle.dot = -1.0;
    assert!(Simulator::try_from(config).is_err());
    assert!(Simulator::try_from(Config::default()).is_ok());
}

#[test]
fn dead_bat_t20_is_tied() {
    let simulation = Simulator::default()
        .simulate(&artificial_pair(), Format::T20, &mut Mock::default())
        .unwrap();
    let data = &simulation.data;
    assert_eq!("T20", data.info.match_type);
    assert_eq!(Some(20), data.info.overs);
    assert_eq!("Alpha", data.info.toss.winner);
    assert_eq!("bat", data.info.toss.decision);
    assert_eq!(2, data.innings.len());
    assert_eq!("Alpha", data.innings[0].team);
    assert_eq!(Some(1), data.innings[1].target.as_ref().and_then(|target| target.runs));
    assert!(simulation.is_tie());
    assert_eq!(None, simulation.winner());
    for inning in &data.innings {
        assert_eq!(20, inning.overs.len());
        assert_inning_laws(inning, Format::T20);
    }

    let scored = simulation.score(1).unwrap();
    assert_eq!("Match tied", scored.outcome);
    let first = &scored.innings[0];
    assert_eq!("0-0", first.score());
    assert_eq!("20 ov", first.overs_str());
    let bowlers: Vec<_> = first.bowlers.iter().map(|bowler| bowler.long_name.as_str()).collect();
    assert_eq!(
        vec![
            "Beta Player 7",
            "Beta Player 8",
            "Beta Player 9",
            "Beta Player 10",
            "Beta Player 11",
            "Beta Player 1"
        ],
        bowlers
    );
    assert_eq!(20, first.bowlers.iter().map(|bowler| bowler.maidens).sum::<u32>());
    assert_eq!(2, first.batters.len());
}

#[test]
fn dead_bat_test_runs_out_of_time() {
    let simulation = Simulator::default()
        .simulate(&artificial_pair(), Format::Test, &mut Mock::default())
        .unwrap();
    assert!(simulation.is_draw());
    assert_eq!(1, simulation.data.innings.len());
    assert_eq!(TEST_OVERS as usize, simulation.data.innings[0].overs.len());
    assert_eq!("Match drawn", simulation.score(1).unwrap().outcome);
}

#[test]
fn limited_overs_laws() {
    let simulator = Simulator::default();
    let mut rand = StdRand::default();
    for format in [Format::T20, Format::Odi] {
        for _ in 0..20 {
            let simulation = simulator.simulate(&artificial_pair(), format, &mut rand).unwrap();
            let data = &simulation.data;
            assert_eq!(2, data.innings.len());
            for inning in &data.innings {
                assert_inning_laws(inning, format);
            }

            let (first, second) = (simulation.inning_runs(0), simulation.inning_runs(1));
            assert!(second <= first + 6);
            let [first_team, second_team] = [&data.innings[0].team, &data.innings[1].team];
            match simulation.winner() {
                Some(winner) if winner == second_team => assert!(second > first),
                Some(winner) if winner == first_team => assert!(first > second),
                Some(winner) => panic!("unexpected winner {winner}"),
                None => assert_eq!(first, second),
            }

            let scored = simulation.score(1).unwrap();
            for (index, inning) in scored.innings.iter().enumerate() {
                let expected = format!(
                    "{}-{}",
                    simulation.inning_runs(index),
                    wickets(&data.innings[index])
                );
                assert_eq!(expected, inning.score());
            }
        }
    }
}

#[test]
fn test_match_shape() {
    let simulator = Simulator::default();
    let mut rand = StdRand::default();
    for _ in 0..10 {
        let simulation = simulator.simulate(&artificial_pair(), Format::Test, &mut rand).unwrap();
        let innings = &simulation.data.innings;
        assert!(!innings.is_empty() && innings.len() <= 4);
        assert!(innings.iter().map(|inning| inning.overs.len() as u32).sum::<u32>() <= TEST_OVERS);
        for inning in innings {
            assert_inning_laws(inning, Format::Test);
        }
        if innings.len() > 2 {
            assert_eq!(innings[0].team, innings[2].team);
        }
        let by = simulation.data.info.outcome.by.clone();
        if let Some(By {
            innings: Some(_), ..
        }) = by
        {
            assert_eq!(3, innings.len());
            assert_eq!(Some(innings[1].team.as_str()), simulation.winner());
        }
        if innings.len() == 4 {
            let runs = |index| simulation.inning_runs(index);
            let target = runs(0) + runs(2) - runs(1) + 1;
            assert_eq!(Some(target), innings[3].target.as_ref().and_then(|target| target.runs));
        }
        simulation.score(1).unwrap();
    }
}

#[test]
fn dismissals_credit_fielders() {
    let simulator = Simulator::default();
    let mut rand = StdRand::default();
    let lineups = artificial_pair();
    for _ in 0..10 {
        let simulation = simulator.simulate(&lineups, Format::T20, &mut rand).unwrap();
        for inning in &simulation.data.innings {
            let fielding = if inning.team == "Alpha" { &lineups[1] } else { &lineups[0] };
            for delivery in inning.overs.iter().flat_map(|over| &over.deliveries) {
                for wicket in &delivery.wickets {
                    assert_eq!(delivery.batter, wicket.player_out);
                    let fielders: Vec<_> = wicket.fielders.iter().map(|f| f.name.as_str()).collect();
                    match wicket.kind.as_str() {
                        "stumped" => assert_eq!(vec![fielding.name(fielding.keeper)], fielders),
                        "caught and bowled" => assert_eq!(vec![delivery.bowler.as_str()], fielders),
                        "caught" => {
                            assert_eq!(1, fielders.len());
                            assert_ne!(delivery.bowler, fielders[0]);
                        }
                        "run out" => assert_eq!(1, fielders.len()),
                        _ => assert!(fielders.is_empty()),
                    }
                }
            }
        }
    }
}

#[test]
fn keeper_never_bowls() {
    let mut lineups = artificial_pair();
    for lineup in &mut lineups {
        lineup.keeper = 6;
    }
    let simulator = Simulator::default();
    let mut rand = StdRand::default();
    for format in [Format::T20, Format::Odi] {
        for _ in 0..10 {
            let simulation = simulator.simulate(&lineups, format, &mut rand).unwrap();
            for inning in &simulation.data.innings {
                let fielding = if inning.team == "Alpha" { &lineups[1] } else { &lineups[0] };
                let keeper = fielding.name(fielding.keeper);
                for delivery in inning.overs.iter().flat_map(|over| &over.deliveries) {
                    assert_ne!(keeper, delivery.bowler, "over bowled by the keeper");
                }
                assert_inning_laws(inning, format);
            }
        }
    }
}

#[test]
fn bowler_fallbacks_skip_keeper() {
    let keeper = 6;
    let mut bowled = [0; XI];
    assert_eq!(7, choose_bowler(keeper, &bowled, None, Some(4), &mut Mock::default()));

    // the pool is bowled out, bar the keeper
    for index in XI - BOWLING_POOL..XI {
        bowled[index] = 4;
    }
    bowled[keeper] = 0;
    assert_eq!(0, choose_bowler(keeper, &bowled, None, Some(4), &mut Mock::default()));

    // everyone is at the cap
    let bowled = [4; XI];
    assert_eq!(8, choose_bowler(keeper, &bowled, Some(7), Some(4), &mut Mock::default()));
}

fn played(runs: u32, wickets: u32, complete: bool) -> Played {
    Played {
        data: InningData::default(),
        runs,
        wickets,
        overs: 0,
        complete,
    }
}

fn won(winner: &str, by: By) -> Outcome {
    Outcome {
        winner: Some(winner.into()),
        by: Some(by),
        ..Outcome::default()
    }
}

fn result(result: &str) -> Outcome {
    Outcome {
        result: Some(result.into()),
        ..Outcome::default()
    }
}

fn by_runs(runs: u32) -> By {
    By {
        runs: Some(runs),
        ..By::default()
    }
}

fn by_wickets(wickets: u32) -> By {
    By {
        wickets: Some(wickets),
        ..By::default()
    }
}

#[test]
fn test_match_results() {
    let (alpha, beta) = (String::from("Alpha"), String::from("Beta"));
    let teams = [&alpha, &beta];
    let decide_test = |played: &[Played]| decide(Format::Test, teams, played);

    assert_eq!(
        won(
            "Beta",
            By {
                innings: Some(1),
                runs: Some(50),
                wickets: None,
            }
        ),
        decide_test(&[played(200, 10, true), played(500, 10, true), played(250, 10, true)])
    );

    // target of 300 + 200 - 250 + 1
    let first_three = || vec![played(300, 10, true), played(250, 10, true), played(200, 10, true)];
    let with_fourth = |fourth: Played| {
        let mut innings = first_three();
        innings.push(fourth);
        decide_test(&innings)
    };
    assert_eq!(won("Beta", by_wickets(6)), with_fourth(played(251, 4, true)));
    assert_eq!(won("Alpha", by_runs(50)), with_fourth(played(200, 10, true)));
    assert_eq!(result("tie"), with_fourth(played(250, 10, true)));
    assert_eq!(result("draw"), with_fourth(played(200, 5, false)));

    // out of time before the fourth innings
    assert_eq!(
        result("draw"),
        decide_test(&[played(400, 10, true), played(150, 3, false)])
    );
    assert_eq!(
        result("draw"),
        decide_test(&[played(200, 10, true), played(500, 10, true), played(100, 2, false)])
    );
}

#[test]
fn limited_overs_results() {
    let (alpha, beta) = (String::from("Alpha"), String::from("Beta"));
    let teams = [&alpha, &beta];
    for format in [Format::T20, Format::Odi] {
        assert_eq!(
            won("Beta", by_wickets(7)),
            decide(format, teams, &[played(150, 6, false), played(151, 3, true)])
        );
        assert_eq!(
            won("Alpha", by_runs(30)),
            decide(format, teams, &[played(180, 6, false), played(150, 10, true)])
        );
        assert_eq!(
            result("tie"),
            decide(format, teams, &[played(150, 6, false), played(150, 10, true)])
        );
        assert_eq!(result("no result"), decide(format, teams, &[played(150, 6, false)]));
        assert_eq!(result("no result"), decide(format, teams, &[]));
    }
}
