use assert_float_eq::*;

use super::*;
use crate::cricsheet::{InningData, PenaltyRuns};
use crate::roles::Spell;
use crate::testing;
use crate::testing::{delivery, over, wicket};

fn sample_innings() -> (Inning, Inning) {
    let data = testing::sample_match_data();
    let mut roster = Roster::from_sources(&data.info, None);
    let first = Inning::replay(0, &data.innings[0], &mut roster).unwrap();
    let second = Inning::replay(1, &data.innings[1], &mut roster).unwrap();
    (first, second)
}

fn sample_roster() -> Roster {
    let data = testing::sample_match_data();
    Roster::from_sources(&data.info, Some(&testing::sample_cricinfo()))
}

fn alpha_inning(overs: Vec<OverData>) -> InningData {
    InningData {
        team: "Alpha".into(),
        overs,
        ..InningData::default()
    }
}

#[test]
fn first_inning_totals() {
    let (inning, _) = sample_innings();
    assert_eq!("Alpha 1st Innings", inning.title());
    assert_eq!("Beta", inning.fielding_team);
    assert_eq!(Score { runs: 21, wickets: 2 }, inning.total);
    assert_eq!("21-2", inning.score());
    assert_eq!("21-2", inning.total_display());
    assert_eq!("2 ov", inning.overs_str());
    assert_eq!(12, inning.legal_balls());
    assert_f64_near!(10.5, inning.run_rate());
    assert_eq!(7, inning.extras());
}

#[test]
fn first_inning_ball_values() {
    let (inning, _) = sample_innings();
    assert_eq!("0 4 0wd 1 1lb W 0", inning.overs[0].to_string());
    assert_eq!("6 2nb 0+W 2 4b 0 0", inning.overs[1].to_string());
    assert_eq!("7-1", inning.overs[0].score());
    assert_eq!("21-2", inning.overs[1].score());
    assert_eq!("7-1", inning.overs[1].start_score);
    assert_eq!(vec!["KK Vaughan"], inning.overs[0].bowlers);

    let wicket_ball = &inning.overs[0].balls[5];
    assert_eq!("0.5", wicket_ball.index_str);
    assert_eq!(4, wicket_ball.abs_index);
    assert_eq!(5, wicket_ball.index);
    assert_eq!("c Mason b Vaughan", wicket_ball.batter.dismissal);
    assert_eq!(1, wicket_ball.bowler.wickets);
    assert_eq!("7 (5) (Archer 5 (4), Baker 0 (1))", wicket_ball.partnership);

    let leg_bye = &inning.overs[0].balls[4];
    assert_eq!("0.4", leg_bye.index_str);
    assert_eq!("CD Baker", leg_bye.batter.name);
    assert_eq!("7-0", leg_bye.score);
    assert_eq!("0* (1)", leg_bye.batter.score());
    assert_eq!("Baker", leg_bye.batter.to_string());
}

#[test]
fn first_inning_batters() {
    let (inning, _) = sample_innings();
    let names: Vec<_> = inning.batters.iter().map(|batter| batter.name.as_str()).collect();
    assert_eq!(vec!["AB Archer", "CD Baker", "EF Carter", "GH Dixon"], names);

    let archer = inning.batter("AB Archer").unwrap();
    assert_eq!("5 (4)", archer.score());
    assert_eq!(1, archer.fours);
    assert_eq!("c Mason b Vaughan", archer.dismissal);

    let baker = inning.batter("CD Baker").unwrap();
    assert_eq!("7* (3)", baker.score());
    assert_eq!(1, baker.sixes);
    assert_eq!(1, baker.position);
    assert_eq!(1, baker.true_position);

    let carter = inning.batter("EF Carter").unwrap();
    assert_eq!("0 (2)", carter.score());
    assert_eq!("run out (Lamb/Vaughan)", carter.dismissal);

    let dixon = inning.batter("GH Dixon").unwrap();
    assert_eq!("2* (4)", dixon.score());
    assert_eq!(3, dixon.position);
}

#[test]
fn first_inning_bowlers_and_fielders() {
    let (inning, _) = sample_innings();
    let vaughan = inning.bowler("KK Vaughan").unwrap();
    assert_eq!("1-6 (1)", vaughan.score());
    assert_eq!(1, vaughan.extras);
    assert_eq!("6.00", vaughan.economy());
    assert_eq!(0, vaughan.maidens);

    let upton = inning.bowler("JJ Upton").unwrap();
    assert_eq!("0-10 (1)", upton.score());
    assert_eq!(1, upton.extras);
    assert_eq!("10.00", upton.economy());

    assert_eq!(11, inning.fielders.len());
    assert_eq!(1, inning.fielder("BB Mason").unwrap().catches);
    assert_eq!(1, inning.fielder("AA Lamb").unwrap().run_outs);
    assert_eq!(1, inning.fielder("KK Vaughan").unwrap().run_outs);
}

#[test]
fn first_inning_fow_and_partnerships() {
    let (inning, _) = sample_innings();
    assert_eq!(
        vec!["7-1 (AB Archer, 0.5 ov)", "15-2 (EF Carter, 1.2 ov)"],
        inning.fow
    );
    assert_eq!(
        vec![
            "7 (5) (Archer 5 (4), Baker 0 (1))",
            "8 (4) (Baker 7 (2), Carter 0 (2))",
            "6* (4) (Baker 0 (0), Dixon 2 (4))"
        ],
        inning.partnerships()
    );
    assert_eq!(2, inning.completed_partnerships.len());
}

#[test]
fn second_inning_maiden_and_spell() {
    let (_, inning) = sample_innings();
    assert_eq!("Beta 1st Innings", inning.title());
    assert_eq!("5-1", inning.score());
    assert_eq!("2.2 ov", inning.overs_str());
    assert_eq!("2.14", format!("{:.2}", inning.run_rate()));
    assert!(inning.overs[0].maiden());
    assert!(!inning.overs[1].maiden());

    let kent = inning.bowler("UV Kent").unwrap();
    assert_eq!("1.2", kent.overs());
    assert_eq!(1, kent.maidens);
    assert_eq!(1, kent.runs);
    assert_eq!("0.75", kent.economy());
    assert_eq!(
        vec![Spell {
            balls: 8,
            maidens: 1,
            runs: 1,
            wickets: 0
        }],
        kent.spells
    );
    assert_eq!(1, inning.overs[0].balls[5].bowler.maidens);

    let jones = inning.bowler("ST Jones").unwrap();
    assert_eq!("1-4 (0.2)", jones.score());
    assert_eq!("b Jones", inning.batter("BB Mason").unwrap().dismissal);
    assert_eq!(vec!["4-1 (BB Mason, 1.2 ov)"], inning.fow);
    assert_eq!(
        vec![
            "4 (8) (Lamb 0 (6), Mason 4 (2))",
            "1* (2) (Lamb 0 (1), Nolan 1 (1))"
        ],
        inning.partnerships()
    );
}

#[test]
fn best_performers() {
    let (first, second) = sample_innings();
    assert_eq!(
        vec![
            ("CD Baker".to_string(), "7* (3)".to_string()),
            ("AB Archer".to_string(), "5 (4)".to_string())
        ],
        first.best_batters(2)
    );
    assert_eq!(
        vec![
            ("BB Mason".to_string(), "4 (2)".to_string()),
            ("CC Nolan".to_string(), "1* (1)".to_string())
        ],
        second.best_batters(2)
    );
    assert_eq!("ST Jones", second.best_bowlers(1)[0].0);
    assert_eq!("KK Vaughan", first.best_bowlers(3)[0].0);
    assert_eq!(2, first.best_bowlers(3).len());
}

#[test]
fn keeper_and_long_names_from_cricinfo() {
    let data = testing::sample_match_data();
    let mut roster = sample_roster();
    let inning = Inning::replay(0, &data.innings[0], &mut roster).unwrap();
    assert!(inning.fielder("BB Mason").unwrap().keeper);
    assert_eq!("c †Mason b Vaughan", inning.batter("AB Archer").unwrap().dismissal);
    assert_eq!("7-1 (Abe Archer, 0.5 ov)", inning.fow[0]);
}

#[test]
fn retirement_substitute_and_penalties() {
    let mut roster = sample_roster();
    let mut retire = delivery("CD Baker", "KK Vaughan", "AB Archer", 0);
    retire.wickets = vec![wicket("CD Baker", "retired hurt", &[])];
    let mut caught = delivery("EF Carter", "KK Vaughan", "AB Archer", 0);
    caught.wickets = vec![wicket("EF Carter", "caught", &[("SS Sub", true)])];
    let data = InningData {
        penalty_runs: Some(PenaltyRuns {
            pre: Some(5),
            post: None,
        }),
        declared: true,
        absent_hurt: vec!["GH Dixon".into()],
        ..alpha_inning(vec![over(
            0,
            vec![
                delivery("AB Archer", "KK Vaughan", "CD Baker", 1),
                retire,
                caught,
                delivery("CD Baker", "KK Vaughan", "AB Archer", 4),
            ],
        )])
    };

    let inning = Inning::replay(0, &data, &mut roster).unwrap();
    assert_eq!("10-1d", inning.score());
    assert_eq!(5, inning.extras());
    assert_eq!(vec!["6-1 (EF Carter, 0.3 ov)"], inning.fow);
    assert_eq!("c sub (Sub) b Vaughan", inning.batter("EF Carter").unwrap().dismissal);

    let baker = inning.batter("CD Baker").unwrap();
    assert_eq!("4* (2)", baker.score());
    assert!(!baker.out());

    let dixon = inning.batter("GH Dixon").unwrap();
    assert_eq!("absent hurt", dixon.dismissal);
    assert_eq!(0, dixon.balls);

    let substitute = inning.fielder("SS Sub").unwrap();
    assert!(substitute.substitute);
    assert_eq!(1, substitute.catches);
    assert_eq!(12, inning.fielders.len());
    assert_eq!(12, roster.squad("Beta").unwrap().len());

    assert_eq!(
        vec![
            "1* (2) (Archer 1 (1), Baker 0 (1))",
            "0 (1) (Archer 0 (0), Carter 0 (1))",
            "4* (1) (Archer 0 (0), Baker 4 (1))"
        ],
        inning.partnerships()
    );
}

#[test]
fn spells_from_each_end() {
    let mut roster = sample_roster();
    let single = |over_number, bowler: &str| over(over_number, vec![delivery("AB Archer", bowler, "CD Baker", 0)]);
    let data = alpha_inning(vec![
        single(0, "KK Vaughan"),
        single(1, "JJ Upton"),
        single(2, "KK Vaughan"),
        single(3, "JJ Upton"),
        over(
            4,
            vec![
                delivery("AB Archer", "AA Lamb", "CD Baker", 0),
                delivery("AB Archer", "KK Vaughan", "CD Baker", 0),
            ],
        ),
        single(5, "AA Lamb"),
    ]);

    let inning = Inning::replay(0, &data, &mut roster).unwrap();
    assert_eq!(2, inning.bowler("KK Vaughan").unwrap().spells.len());
    assert_eq!(1, inning.bowler("JJ Upton").unwrap().spells.len());
    assert_eq!(2, inning.bowler("AA Lamb").unwrap().spells.len());
    assert_eq!(vec!["AA Lamb", "KK Vaughan"], inning.overs[4].bowlers);
}

#[test]
fn unknown_players_and_dismissals() {
    let mut roster = sample_roster();
    let ghost = alpha_inning(vec![over(0, vec![delivery("XX Ghost", "KK Vaughan", "CD Baker", 0)])]);
    assert_eq!(
        ScoringError::UnknownPlayer {
            team: "Alpha".into(),
            name: "XX Ghost".into()
        },
        Inning::replay(0, &ghost, &mut roster).unwrap_err()
    );

    let mut odd = delivery("AB Archer", "KK Vaughan", "CD Baker", 0);
    odd.wickets = vec![wicket("AB Archer", "abducted", &[])];
    let unseen = alpha_inning(vec![over(0, vec![odd])]);
    assert_eq!(
        ScoringError::UnknownDismissal("abducted".into()),
        Inning::replay(0, &unseen, &mut roster).unwrap_err()
    );

    let gamma = InningData {
        team: "Gamma".into(),
        ..InningData::default()
    };
    assert_eq!(
        ScoringError::UnknownTeam("Gamma".into()),
        Inning::replay(0, &gamma, &mut roster).unwrap_err()
    );
}

#[test]
fn empty_inning() {
    let mut roster = sample_roster();
    let inning = Inning::replay(2, &alpha_inning(vec![]), &mut roster).unwrap();
    assert_eq!("Alpha 2nd Innings", inning.title());
    assert_eq!("0 ov", inning.overs_str());
    assert_eq!(0.0, inning.run_rate());
    assert!(inning.partnerships().is_empty());
}
