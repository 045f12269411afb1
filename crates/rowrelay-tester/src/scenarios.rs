//! Scenario runners: build a scripted host, drive the engine, report.

use std::sync::Arc;

use rowrelay_engine::{
    EngineConfig, MoveOutcome, MoveReport, Notice, Notifier, ReorderController,
    menu::MoveSelection,
    model,
    strategy::{StrategyId, default_stack},
};
use rowrelay_view::{
    ItemId,
    sim::{SimBehavior, SimHost, Technique},
};
use tokio::sync::mpsc;
use tracing::info;

use crate::{
    cli::{ExhaustArgs, MatrixArgs, MenuArgs, MoveArgs, TechniqueArg},
    error::{Error, Result},
};

fn host_with(items: &[String], behavior: SimBehavior) -> Arc<SimHost> {
    let names: Vec<&str> = items.iter().map(String::as_str).collect();
    SimHost::with_behavior(&names, behavior)
}

fn print_report(report: &MoveReport) {
    for attempt in &report.attempts {
        let disposition = match (&attempt.fault, attempt.verification) {
            (Some(fault), _) => format!("fault: {fault}"),
            (None, Some(v)) => format!("changed={} elapsed={:?}", v.changed, v.elapsed),
            (None, None) => "skipped".to_string(),
        };
        println!("  {:<12} {}", attempt.strategy.as_str(), disposition);
    }
    match report.outcome {
        MoveOutcome::Verified(id) if report.visual_only() => {
            println!("outcome: visually reordered via {id} (not verified-persisted)");
        }
        MoveOutcome::Verified(id) => println!("outcome: verified via {id}"),
        MoveOutcome::Rejected(reason) => println!("outcome: rejected ({reason})"),
        MoveOutcome::Exhausted => println!("outcome: exhausted"),
    }
}

fn print_notices(rx: &mut mpsc::Receiver<Notice>) {
    while let Ok(notice) = rx.try_recv() {
        println!("notice [{:?}]: {}", notice.severity, notice.text);
    }
}

/// Run one move against a host accepting the given techniques.
pub async fn run_move(args: &MoveArgs) -> Result<()> {
    let techniques: Vec<Technique> = args
        .accept
        .iter()
        .map(|arg| arg.into_technique())
        .collect();
    let host = host_with(&args.items, SimBehavior::accepting(&techniques));

    let mut config = EngineConfig::default();
    if let Some(verify) = args.verify {
        config.verify_ms = verify.as_millis() as u64;
        config.quick_verify_ms = config.quick_verify_ms.min(config.verify_ms);
    }

    let (tx, mut rx) = mpsc::channel(16);
    let ctrl = ReorderController::new(host.clone(), config).with_notifier(Notifier::new(tx));

    println!("before: {}", host.order_key());
    let report = ctrl.move_item_report(args.from, args.to).await;
    print_report(&report);
    println!("after:  {}", host.order_key());
    print_notices(&mut rx);

    if report.moved() { Ok(()) } else { Err(Error::Unverified) }
}

/// Drive a host that ignores everything and watch escalation exhaust.
pub async fn run_exhaust(args: &ExhaustArgs) -> Result<()> {
    let host = host_with(&args.items, SimBehavior::deaf());

    let mut stack = default_stack();
    if !args.keep_splice {
        stack.retain(|strategy| strategy.id() != StrategyId::Splice);
    }

    let (tx, mut rx) = mpsc::channel(16);
    let ctrl = ReorderController::new(host.clone(), EngineConfig::default())
        .with_notifier(Notifier::new(tx))
        .with_strategies(stack);

    println!("before: {}", host.order_key());
    let report = ctrl.move_item_report(args.from, args.to).await;
    print_report(&report);
    println!("after:  {}", host.order_key());
    print_notices(&mut rx);

    // Exhaustion is the expected outcome here, so it is not an error.
    Ok(())
}

/// Resolve a menu selection by display names and run the move.
pub async fn run_menu(args: &MenuArgs) -> Result<()> {
    let host = host_with(&args.items, SimBehavior::default());
    let ctrl = ReorderController::new(host.clone(), EngineConfig::default());

    let items = model::snapshot(host.as_ref()).await;
    let find = |name: &str| -> Result<ItemId> {
        items
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.id)
            .ok_or_else(|| Error::argument(format!("no item named {name:?}")))
    };

    let source = find(&args.source)?;
    let selection = match args.selection.as_str() {
        "top" => MoveSelection::Top,
        "end" => MoveSelection::End,
        other => match other.strip_prefix("after:") {
            Some(name) => MoveSelection::After(find(name)?),
            None => {
                return Err(Error::argument(format!(
                    "selection must be top, end, or after:<name>, got {other:?}"
                )));
            }
        },
    };

    println!("before: {}", host.order_key());
    let moved = ctrl.move_selection(source, selection).await;
    println!("after:  {} (moved={moved})", host.order_key());
    if moved { Ok(()) } else { Err(Error::Unverified) }
}

/// Expected verified strategy for each accepted technique.
fn expected_strategy(arg: TechniqueArg) -> StrategyId {
    match arg {
        TechniqueArg::Hook => StrategyId::Hook,
        TechniqueArg::Store => StrategyId::Store,
        TechniqueArg::Pointer => StrategyId::PointerDrag,
        TechniqueArg::Mouse => StrategyId::MouseDrag,
        TechniqueArg::Dnd => StrategyId::NativeDnd,
        TechniqueArg::Keyboard => StrategyId::Keyboard,
    }
}

/// Run every technique/strategy pairing and print the acceptance matrix.
pub async fn run_matrix(args: &MatrixArgs) -> Result<()> {
    const TECHNIQUES: [TechniqueArg; 6] = [
        TechniqueArg::Hook,
        TechniqueArg::Store,
        TechniqueArg::Pointer,
        TechniqueArg::Mouse,
        TechniqueArg::Dnd,
        TechniqueArg::Keyboard,
    ];

    let mut mismatches = Vec::new();
    for technique in TECHNIQUES {
        let host = host_with(
            &args.items,
            SimBehavior::accepting(&[technique.into_technique()]),
        );
        let ctrl = ReorderController::new(host.clone(), EngineConfig::default());
        let report = ctrl.move_item_report(args.from, args.to).await;

        let verified = match report.outcome {
            MoveOutcome::Verified(id) => id,
            other => {
                mismatches.push(format!("{technique:?}: no verified strategy ({other:?})"));
                continue;
            }
        };
        let expected = expected_strategy(technique);
        let marker = if verified == expected { "ok" } else { "MISMATCH" };
        println!(
            "{:<10} -> {:<12} (expected {:<12}) {}",
            format!("{technique:?}"),
            verified.as_str(),
            expected.as_str(),
            marker
        );
        info!(technique = ?technique, verified = verified.as_str(), "matrix_row");
        if verified != expected {
            mismatches.push(format!(
                "{technique:?}: verified via {verified}, expected {expected}"
            ));
        }
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(Error::MatrixMismatch(mismatches.join("; ")))
    }
}
