use draw_poker::agents::ScriptedAgent;
use draw_poker::betting::Action::{Call, Fold, Raise};
use draw_poker::cards::parse_cards;
use draw_poker::deck::Deck;
use draw_poker::evaluator::Category;
use draw_poker::game::{HistoryVerb, Phase, RoundOutcome, Table, TableConfig};

fn mk_table(names: &[&str]) -> Table {
    Table::new(names.iter().copied(), TableConfig::default().with_starting_purse(1000))
        .expect("valid table")
}

/// Seat 0 is dealt first on the opening round.
fn stacked(deal: &str) -> Deck {
    Deck::stacked(parse_cards(deal).expect("valid cards")).expect("distinct cards")
}

#[test]
fn three_way_royal_tie_splits_with_truncation() {
    let mut t = mk_table(&["Ann", "Ben", "Cat"]);
    let deck = stacked(
        "Ah Kh Qh Jh 10h \
         As Ks Qs Js 10s \
         Ad Kd Qd Jd 10d \
         2c 3c 4c",
    );
    let mut agent = ScriptedAgent::new(
        [
            // first bet: 10, raised to 20, two calls -> 70
            Raise(10),
            Raise(10),
            Call,
            Call,
            // second bet: 10 called around -> 100
            Raise(10),
            Call,
            Call,
        ],
        [vec![], vec![], vec![]],
    );
    let summary = t.play_round_with_deck(deck, &mut agent).unwrap();

    assert_eq!(summary.outcome, RoundOutcome::Showdown);
    assert_eq!(summary.category, Some(Category::RoyalFlush));
    assert_eq!(summary.pot, 100);
    assert_eq!(summary.winners.len(), 3);
    assert!(summary.winners.iter().all(|w| w.share == 33));
    assert_eq!(summary.remainder, 1);
    assert_eq!(t.players()[0].purse(), 1000 - 40 + 33);
    assert_eq!(t.players()[1].purse(), 1000 - 30 + 33);
    assert_eq!(t.players()[2].purse(), 1000 - 30 + 33);
    let splits = summary.history.iter().filter(|h| h.verb == HistoryVerb::Split).count();
    assert_eq!(splits, 3);
}

#[test]
fn higher_quads_take_the_pot() {
    let mut t = mk_table(&["Ann", "Ben"]);
    let deck = stacked("8s 8h 8d 8c 4s 9s 9h 9d 9c 4h");
    let mut agent = ScriptedAgent::new([Raise(5), Call, Call, Call], [vec![], vec![]]);
    let summary = t.play_round_with_deck(deck, &mut agent).unwrap();
    assert_eq!(summary.category, Some(Category::FourOfAKind));
    assert_eq!(summary.winners.len(), 1);
    assert_eq!(summary.winners[0].name, "Ben");
    assert_eq!(summary.winners[0].share, 10);
    assert_eq!(t.players()[0].purse(), 995);
    assert_eq!(t.players()[1].purse(), 1005);
}

#[test]
fn draw_can_change_the_winner() {
    let mut t = mk_table(&["Ann", "Ben"]);
    // Ann holds a pair of twos and draws into trips; Ben keeps ace high
    let deck = stacked("2s 2h 7d 9c Jc Ah Kd 8s 6c 3d 2d 5s 4h");
    let mut agent =
        ScriptedAgent::new([Call, Call, Call, Call], [vec![2, 3, 4], vec![]]);
    let summary = t.play_round_with_deck(deck, &mut agent).unwrap();
    let ann = t.players()[0].hand().unwrap();
    assert_eq!(ann.cards()[..2], parse_cards("2s 2h").unwrap()[..]);
    assert_eq!(ann.category(), Category::ThreeOfAKind);
    assert_eq!(summary.winners[0].seat, 0);
    let discard = summary.history.iter().find(|h| h.verb == HistoryVerb::Discard).unwrap();
    assert_eq!((discard.seat, discard.amount, discard.phase), (0, Some(3), Phase::Draw));
}

#[test]
fn bad_discards_are_refused_and_asked_again() {
    let mut t = mk_table(&["Ann", "Ben"]);
    let deck = stacked("2s 2h 7d 9c Jc Ah Kd 8s 6c 3d 2d 5s 4h");
    let mut agent = ScriptedAgent::new(
        [Call, Call, Call, Call],
        [vec![0, 1, 2, 3], vec![7], vec![1, 1], vec![], vec![]],
    );
    let summary = t.play_round_with_deck(deck, &mut agent).unwrap();
    assert_eq!(agent.rejections(), 3);
    assert_eq!(t.players()[0].hand().unwrap().cards()[..], parse_cards("2s 2h 7d 9c Jc").unwrap()[..]);
    assert_eq!(summary.category, Some(Category::OnePair));
}

#[test]
fn fold_in_second_bet_skips_showdown() {
    let mut t = mk_table(&["Ann", "Ben", "Cat"]);
    let mut agent = ScriptedAgent::new(
        [Raise(20), Call, Call, Raise(30), Fold, Fold],
        [vec![], vec![0], vec![0, 1]],
    );
    let summary = t.play_round(&mut agent).unwrap();
    assert_eq!(summary.outcome, RoundOutcome::Uncontested);
    assert_eq!(summary.category, None);
    assert_eq!(summary.pot, 60 + 30);
    assert_eq!(summary.winners[0].seat, 0);
    assert_eq!(t.players()[0].purse(), 1000 - 50 + 90);
    assert_eq!(summary.history.last().unwrap().phase, Phase::SecondBet);
}

#[test]
fn chips_are_conserved_apart_from_the_remainder() {
    let mut t = Table::new(["a", "b", "c", "d"], TableConfig::default().with_seed(99))
        .expect("valid table");
    for _ in 0..5 {
        let mut agent = ScriptedAgent::new(
            [Raise(3), Call, Call, Call, Call, Call, Call, Call],
            [vec![0], vec![1, 2], vec![], vec![4, 3, 2]],
        );
        let before: u64 = t.players().iter().map(|p| p.purse()).sum();
        let summary = t.play_round(&mut agent).unwrap();
        let after: u64 = t.players().iter().map(|p| p.purse()).sum();
        assert_eq!(before, after + summary.remainder);
        assert_eq!(summary.pot, 12);
    }
}

#[test]
fn aborted_round_refunds_every_bet() {
    let mut t = mk_table(&["Ann", "Ben"]);
    // betting goes through, then nobody answers the draw
    let mut agent = ScriptedAgent::new([Raise(10), Call], Vec::new());
    let err = t.play_round(&mut agent).unwrap_err();
    assert_eq!(err.to_string(), "no decision available for seat 0");
    assert_eq!(t.players()[0].purse(), 1000);
    assert_eq!(t.players()[1].purse(), 1000);
}

#[test]
fn short_deck_refunds_bets_made_before_the_draw() {
    let mut t = mk_table(&["Ann", "Ben"]);
    let deck = stacked("2s 2h 7d 9c Jc Ah Kd 8s 6c 3d");
    let mut agent = ScriptedAgent::new([Raise(25), Call], [vec![0]]);
    let err = t.play_round_with_deck(deck, &mut agent).unwrap_err();
    assert!(matches!(err, draw_poker::game::RoundError::Deck(_)));
    let total: u64 = t.players().iter().map(|p| p.purse()).sum();
    assert_eq!(total, 2000);
    assert_eq!(t.players()[0].purse(), 1000);
}
