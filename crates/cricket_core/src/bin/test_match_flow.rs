use cricket_core::{
    BatterSlot, DismissalKind, MatchConfig, MatchEngine, SaveManager, Team, Teams,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏏 Testing Cricket Scoring Engine Integration...");

    // Test 1: Match setup and opening selections
    println!("\n🧪 Test 1: Setup and opening selections");

    let teams = Teams::new(
        Team::new(
            "Northfield CC",
            vec!["Priya", "Sam", "Tariq", "Una", "Viktor"].into_iter().map(String::from).collect(),
        ),
        Team::new(
            "Oakwood Park",
            vec!["Wes", "Xiu", "Yusuf", "Zara", "Abel"].into_iter().map(String::from).collect(),
        ),
    );

    let mut engine = MatchEngine::new(teams, MatchConfig::limited(3))?;

    match engine.pending_selection() {
        Some(pending) => println!("✅ First gate open: {}", pending.kind.prompt()),
        None => return Err("Opening striker selection should be pending".into()),
    }

    engine.resolve_selection("Priya")?;
    engine.resolve_selection("Sam")?;
    engine.resolve_selection("Wes")?;

    if engine.striker() == Some("Priya") && engine.bowler() == Some("Wes") {
        println!("✅ Openers and bowler in place");
    } else {
        return Err("Openers should be at the crease".into());
    }

    // Test 2: An over with runs and every extra
    println!("\n🧪 Test 2: Runs, no-ball, wide and bye in one over");

    engine.record_runs(4)?;
    engine.record_runs(1)?;
    engine.record_no_ball(2)?;
    engine.record_wide(0)?;
    engine.record_runs(6)?;
    engine.record_byes(1)?;

    println!("✅ Over so far: {:?}", engine.current_over());

    engine.record_runs(0)?;
    engine.record_runs(2)?;

    if engine.state().score == 18 && engine.overs_display() == "1.0" {
        println!("✅ Over closed at 18/0 after six legal balls");
    } else {
        return Err(format!(
            "Expected 18/0 (1.0), got {}/{} ({})",
            engine.state().score,
            engine.state().wickets,
            engine.overs_display()
        )
        .into());
    }

    if engine.striker() == Some("Sam") {
        println!("✅ Batters changed ends for the new over");
    } else {
        return Err("Strike should have rotated at the over break".into());
    }

    engine.resolve_selection("Xiu")?;

    // Test 3: Wickets and the selection gates they open
    println!("\n🧪 Test 3: Dismissals and replacement selections");

    engine.record_wicket(DismissalKind::Bowled, BatterSlot::Striker)?;
    engine.resolve_selection("Tariq")?;
    engine.record_runs(1)?;

    engine.record_wicket(DismissalKind::Caught, BatterSlot::Striker)?;
    engine.resolve_selection("Zara")?;
    engine.resolve_selection("Una")?;

    let priya_out = engine
        .state()
        .stats
        .player("Priya")
        .and_then(|stat| stat.how_out.clone());
    if priya_out.as_deref() == Some("c Zara b Xiu") {
        println!("✅ Dismissal recorded: Priya {}", priya_out.unwrap());
    } else {
        return Err(format!("Unexpected dismissal line: {:?}", priya_out).into());
    }

    engine.record_runs(4)?;
    engine.record_runs(0)?;
    engine.record_runs(1)?;
    engine.resolve_selection("Yusuf")?;

    if engine.state().wickets == 2 && engine.overs_display() == "2.0" {
        println!("✅ Scoreboard reads {} after two overs", engine.scoreline());
    } else {
        return Err(format!("Unexpected scoreboard: {}", engine.scoreline()).into());
    }

    // Test 4: Undo rolls back a whole scoring action
    println!("\n🧪 Test 4: Undo");

    engine.record_runs(6)?;
    if !engine.undo() {
        return Err("Undo should have had a snapshot to restore".into());
    }

    if engine.state().score == 24 && engine.overs_display() == "2.0" {
        println!("✅ Mis-keyed six rolled back to {}", engine.scoreline());
    } else {
        return Err("Undo should restore the pre-ball state".into());
    }

    engine.record_runs(2)?;

    if engine.declare().is_err() {
        println!("✅ Declaration rejected in a limited-overs match");
    } else {
        return Err("Declaration should be rejected outside multi-innings play".into());
    }

    engine.end_innings_early()?;
    let first = &engine.state().records[0];
    println!(
        "✅ First innings closed at {}/{} ({})",
        first.score, first.wickets, first.overs
    );

    if engine.target() != Some(27) {
        return Err(format!("Expected a target of 27, got {:?}", engine.target()).into());
    }
    println!("✅ Oakwood Park need 27 to win");

    // Test 5: Save mid-chase, load, and finish the match
    println!("\n🧪 Test 5: Save/load mid-chase");

    engine.resolve_selection("Wes")?;
    engine.resolve_selection("Xiu")?;
    engine.resolve_selection("Priya")?;
    engine.record_runs(4)?;
    engine.record_runs(6)?;

    let manager = SaveManager::new("saves");
    manager.save(&engine)?;
    println!("✅ Saved at {}", engine.scoreline());

    match manager.info()? {
        Some(info) => println!("✅ Snapshot info: {}", info.get_display_text()),
        None => return Err("Snapshot info should be available".into()),
    }

    drop(engine);
    let mut resumed = manager.load()?;

    if resumed.state().score == 10 && resumed.target() == Some(27) {
        println!("✅ Chase resumed from disk at {}", resumed.scoreline());
    } else {
        return Err("Restored state does not match the saved chase".into());
    }

    resumed.record_runs(6)?;
    resumed.record_runs(6)?;
    resumed.record_runs(4)?;
    resumed.record_runs(1)?;

    match resumed.result_text() {
        Some(result) if result == "Oakwood Park won by 4 wickets!" => {
            println!("✅ {}", result);
        }
        other => return Err(format!("Unexpected result: {:?}", other).into()),
    }

    let report = resumed.report();
    println!("✅ Innings summary: {}", report.innings_summary_b);
    if let Some(award) = &report.player_of_match {
        println!("✅ Player of the match: {} ({})", award.name, award.detail);
    } else {
        return Err("A finished match should name a player of the match".into());
    }

    manager.delete()?;
    if !manager.exists() {
        println!("✅ Snapshot cleaned up");
    } else {
        return Err("Snapshot should be gone after delete".into());
    }

    println!("\n🎉 ALL SCORING ENGINE TESTS PASSED SUCCESSFULLY!");
    println!("✅ Selection gates sequencing correctly");
    println!("✅ Extras and strike rotation working");
    println!("✅ Dismissal strings and fielder credits working");
    println!("✅ Undo restoring whole scoring actions");
    println!("✅ MessagePack + LZ4 snapshots with SHA256 verification working");

    Ok(())
}
