//! spin-runner: headless wheel runner.
//!
//! Usage:
//!   spin-runner --seed 12345 --spins 100000 --stake 50 --balance 1000000
//!   spin-runner --config data/wheel.json --db wallet.db --ipc-mode

use anyhow::Result;
use luxspin_core::{
    clock::TableClock,
    command::TableCommand,
    config::WheelConfig,
    error::{WheelError, WheelResult},
    event::SpinEvent,
    geometry::RotationState,
    resolver::resolve_spin,
    rng::{EntropySource, RandomSource, RngBank, StreamSlot},
    stats::{chi_square, chi_square_critical_p001, expected_delta_per_stake, SpinTally},
    store::{PlayerWallet, WalletStore},
    table::{SpinPhase, SpinTable},
    types::{format_cents, Cents, PlayerId},
    wallet::{apply_settlement, BalanceStore, MemoryWallet},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Serialize)]
struct UiState {
    at_ms: u64,
    phase: SpinPhase,
    balance: Cents,
    player_id: Option<String>,
    outer_labels: Vec<String>,
    inner_labels: Vec<String>,
    outer_rotation: f64,
    inner_rotation: f64,
    reveal_due_ms: Option<u64>,
    last_result: Option<luxspin_core::table::RevealedSpin>,
    events: Vec<SpinEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let spins = parse_arg(&args, "--spins", 100_000u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let entropy = args.iter().any(|a| a == "--entropy");
    let config = match string_arg(&args, "--config") {
        Some(path) => WheelConfig::load(path)?,
        None => WheelConfig::canonical(),
    };
    let stake = parse_arg(&args, "--stake", config.default_stake);
    let balance = parse_arg(&args, "--balance", 1_000_000 as Cents);
    let db = string_arg(&args, "--db").unwrap_or(":memory:");

    let mut rng: Box<dyn RandomSource> = if entropy {
        Box::new(EntropySource::new())
    } else {
        Box::new(RngBank::new(seed).for_slot(StreamSlot::Table))
    };

    if ipc_mode {
        let store = if db == ":memory:" {
            WalletStore::in_memory()?
        } else {
            WalletStore::open(db)?
        };
        store.migrate()?;
        run_ipc_loop(&config, &store, rng.as_mut())?;
    } else {
        println!("LuxSpin - spin-runner");
        println!("  seed:      {seed}");
        println!("  spins:     {spins}");
        println!("  stake:     {}", format_cents(stake));
        println!("  balance:   {}", format_cents(balance));
        println!("  rng:       {}", if entropy { "os entropy" } else { "seeded" });
        println!();
        run_batch(&config, spins, stake, balance, rng.as_mut())?;
    }

    Ok(())
}

/// Resolve `spins` spins back to back and print frequency and money
/// summaries. The wallet is clamped at zero; the run stops early if the
/// stake becomes unaffordable.
fn run_batch(
    config: &WheelConfig,
    spins: u64,
    stake: Cents,
    balance: Cents,
    rng: &mut dyn RandomSource,
) -> Result<()> {
    let (outer, inner) = config.build_rings()?;
    let mut rotation = RotationState::default();
    let mut wallet = MemoryWallet::new(balance);
    let mut tally = SpinTally::new(&outer, &inner);
    let mut busted_at = None;

    for n in 0..spins {
        if wallet.balance() < stake {
            busted_at = Some(n);
            break;
        }
        let result = resolve_spin(stake, &outer, &inner, &mut rotation, rng);
        apply_settlement(&mut wallet, &result.settlement)?;
        tally.record(&result);
    }

    println!("=== RUN SUMMARY ===");
    println!("  spins run:      {}", tally.spins);
    println!("  wins / losses:  {} / {}", tally.wins, tally.losses);
    println!("  total staked:   {}", format_cents(tally.total_staked));
    println!("  total delta:    {}", format_cents(tally.total_delta));
    println!("  final balance:  {}", format_cents(wallet.balance()));
    println!("  observed RTP:   {:.4}", tally.rtp());
    println!("  expected RTP:   {:.4}", 1.0 + expected_delta_per_stake(&outer, &inner));
    if let Some(n) = busted_at {
        println!("  stopped after {n} spins: balance below stake");
    }

    for (ring, hits) in [(&outer, &tally.outer_hits), (&inner, &tally.inner_hits)] {
        println!();
        println!("=== {} RING ===", ring.name().to_uppercase());
        let total: f64 = ring.weights().iter().sum();
        for (seg, count) in ring.segments().iter().zip(hits.iter()) {
            let observed = if tally.spins > 0 {
                *count as f64 / tally.spins as f64 * 100.0
            } else {
                0.0
            };
            println!(
                "  {:>5} | expected {:>6.2}% | observed {:>6.2}% | {count}",
                seg.label(),
                seg.weight / total * 100.0,
                observed,
            );
        }
        let stat = chi_square(hits, ring.weights());
        match chi_square_critical_p001(ring.len().saturating_sub(1)) {
            Some(critical) => println!(
                "  chi-square: {stat:.3} (critical {critical:.3} at p=0.001, {})",
                if stat < critical { "fit" } else { "MISFIT" }
            ),
            None => println!("  chi-square: {stat:.3}"),
        }
    }
    Ok(())
}

/// One IPC client: the table, its clock and whichever wallet is active.
/// Until a player registers or logs in, play runs on a guest wallet.
struct IpcSession<'a> {
    config: &'a WheelConfig,
    store: &'a WalletStore,
    table: SpinTable,
    clock: TableClock,
    player_id: Option<PlayerId>,
    guest: MemoryWallet,
}

impl<'a> IpcSession<'a> {
    fn new(config: &'a WheelConfig, store: &'a WalletStore) -> WheelResult<Self> {
        Ok(Self {
            config,
            store,
            table: SpinTable::from_config(config)?,
            clock: TableClock::new(),
            player_id: None,
            guest: MemoryWallet::new(0),
        })
    }

    fn handle(&mut self, cmd: &TableCommand, rng: &mut dyn RandomSource) -> WheelResult<()> {
        match cmd {
            TableCommand::Register { name, email, phone } => {
                self.ensure_not_spinning()?;
                let id = self
                    .store
                    .register_player(name, email, phone, self.config.welcome_bonus)?;
                self.attach(id)
            }
            TableCommand::Login { email } => {
                self.ensure_not_spinning()?;
                let record = self
                    .store
                    .find_by_email(email)?
                    .ok_or_else(|| WheelError::PlayerNotFound { player_id: email.clone() })?;
                log::info!("player {} logged in", record.player_id);
                self.attach(record.player_id)
            }
            TableCommand::Logout => {
                self.table.teardown(self.clock.now());
                if let Some(id) = self.player_id.take() {
                    log::info!("player {id} logged out");
                }
                self.guest = MemoryWallet::new(0);
                Ok(())
            }
            _ => match &self.player_id {
                Some(id) => {
                    let mut wallet = PlayerWallet::open(self.store, id)?;
                    handle_command(cmd, self.config, &mut self.table, &mut self.clock, &mut wallet, rng)
                }
                None => handle_command(
                    cmd,
                    self.config,
                    &mut self.table,
                    &mut self.clock,
                    &mut self.guest,
                    rng,
                ),
            },
        }
    }

    /// Switch to `player_id`'s account. Guest winnings follow the player.
    fn attach(&mut self, player_id: PlayerId) -> WheelResult<()> {
        let carried = self.guest.balance();
        if carried > 0 {
            self.store.credit(&player_id, carried)?;
        }
        self.guest = MemoryWallet::new(0);
        self.player_id = Some(player_id);
        Ok(())
    }

    fn ensure_not_spinning(&self) -> WheelResult<()> {
        if self.table.phase() == SpinPhase::Spinning {
            return Err(WheelError::SpinInProgress);
        }
        Ok(())
    }

    fn balance(&self) -> WheelResult<Cents> {
        match &self.player_id {
            Some(id) => self.store.balance(id),
            None => Ok(self.guest.balance()),
        }
    }

    fn state(&mut self) -> Result<UiState> {
        match &self.player_id {
            Some(id) => {
                let wallet = PlayerWallet::open(self.store, id)?;
                build_ui_state(&mut self.table, &self.clock, &wallet, Some(id))
            }
            None => build_ui_state(&mut self.table, &self.clock, &self.guest, None),
        }
    }

    fn close(&mut self) {
        self.table.teardown(self.clock.now());
    }
}

fn run_ipc_loop(config: &WheelConfig, store: &WalletStore, rng: &mut dyn RandomSource) -> Result<()> {
    let mut session = IpcSession::new(config, store)?;
    log::info!("ipc mode: reveal delay {}ms", config.reveal_delay_ms);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: TableCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("ignoring malformed command line: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if cmd == TableCommand::Quit {
            break;
        }

        if let Err(e) = session.handle(&cmd, rng) {
            log::debug!("command {cmd:?} failed: {e}");
            let err_json = serde_json::json!({ "error": e.to_string() });
            writeln!(stdout, "{}", err_json)?;
        }

        let state = session.state()?;
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }

    session.close();
    Ok(())
}

fn handle_command<W: BalanceStore>(
    cmd: &TableCommand,
    config: &WheelConfig,
    table: &mut SpinTable,
    clock: &mut TableClock,
    wallet: &mut W,
    rng: &mut dyn RandomSource,
) -> WheelResult<()> {
    match cmd {
        TableCommand::GetState
        | TableCommand::Quit
        | TableCommand::Register { .. }
        | TableCommand::Login { .. }
        | TableCommand::Logout => {}
        TableCommand::Spin { stake } => {
            let stake = stake.unwrap_or(config.default_stake);
            table.start_spin(stake, &*wallet, rng, clock.now())?;
        }
        TableCommand::Advance { ms } => {
            clock.advance_millis(*ms);
            table.poll(wallet, clock.now())?;
        }
        TableCommand::Dismiss => table.dismiss(),
        TableCommand::Teardown => {
            table.teardown(clock.now());
        }
        TableCommand::Deposit { amount } => {
            wallet.credit(amount.unwrap_or(config.deposit_amount))?;
        }
    }
    Ok(())
}

fn build_ui_state<W: BalanceStore>(
    table: &mut SpinTable,
    clock: &TableClock,
    wallet: &W,
    player_id: Option<&String>,
) -> Result<UiState> {
    let rotation = *table.rotation();
    Ok(UiState {
        at_ms: clock.now().as_millis() as u64,
        phase: table.phase(),
        balance: wallet.current_balance()?,
        player_id: player_id.cloned(),
        outer_labels: table.outer_ring().labels(),
        inner_labels: table.inner_ring().labels(),
        outer_rotation: rotation.outer.target_degrees,
        inner_rotation: rotation.inner.target_degrees,
        reveal_due_ms: table.reveal_due_at().map(|d| d.as_millis() as u64),
        last_result: table.last_revealed().cloned(),
        events: table.drain_events(),
    })
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
