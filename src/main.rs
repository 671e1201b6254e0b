//! Tap Economy entry point
//!
//! Handles platform-specific initialization and wires the engine to its host.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::Document;

    use tap_economy::persistence::{LocalStorageStore, MemoryStore, Store};
    use tap_economy::platform::interval::Interval;
    use tap_economy::{
        Command, EconomyConfig, Engine, EngineEvent, GameState, SystemClock, WalletStatus,
        format_number, themes, view,
    };

    thread_local! {
        static ENGINE: RefCell<Option<Rc<RefCell<Engine>>>> = RefCell::new(None);
        static TIMER: RefCell<Option<Interval>> = RefCell::new(None);
    }

    /// Called by the wallet-connect SDK on every status change
    #[wasm_bindgen]
    pub fn set_wallet_status(connected: bool, address: Option<String>) {
        with_engine(|engine| engine.set_wallet(WalletStatus { connected, address }));
    }

    /// Run a `data-action` command from script
    #[wasm_bindgen]
    pub fn dispatch_action(action: &str, payload: Option<String>) -> bool {
        match Command::from_action(action, payload.as_deref()) {
            Some(command) => with_engine(|engine| engine.dispatch(command)).unwrap_or(false),
            None => false,
        }
    }

    fn with_engine<R>(f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
        let engine = ENGINE.with(|cell| cell.borrow().clone())?;
        let mut engine = engine.try_borrow_mut().ok()?;
        Some(f(&mut engine))
    }

    /// Theme from `?theme=<id>`, else the default
    fn requested_theme() -> EconomyConfig {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.strip_prefix("theme="))
            .find_map(themes::by_id)
            .unwrap_or_else(themes::galactic_diplomacy)
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(document: &Document, id: &str, class: &str, on: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    /// Push the current state into the page
    fn render(document: &Document, config: &EconomyConfig, state: &GameState, now_ms: f64) {
        let header = view::header(config, state);
        set_text(document, "game-title", &header.title);
        set_text(document, "wallet-label", &header.wallet_label);
        set_class(document, "wallet-label", "connected", header.wallet_connected);

        let tapper = view::tapper(config, state);
        set_text(document, "currency-symbol", &tapper.symbol);
        set_text(document, "currency-value", &tapper.currency);
        set_text(document, "rate-value", &tapper.per_hour);
        set_text(document, "tap-value", &tapper.per_tap);

        for card in view::upgrades(config, state) {
            let id = &card.id;
            set_text(document, &format!("upgrade-{id}-icon"), &card.icon);
            set_text(document, &format!("upgrade-{id}-name"), &card.name);
            set_text(document, &format!("upgrade-{id}-rate"), &card.rate);
            set_text(document, &format!("upgrade-{id}-level"), &card.level.to_string());
            set_text(document, &format!("upgrade-{id}-cost"), &format!("{} {}", card.symbol, card.cost));
            set_class(document, &format!("upgrade-{id}"), "can-afford", card.affordable);
        }

        let stats = view::stats(state, now_ms);
        set_text(document, "stat-taps", &stats.total_taps);
        set_text(document, "stat-generated", &stats.total_generated);
        set_text(document, "stat-days", &stats.days_active.to_string());

        for item in view::nav(config, state) {
            set_text(document, &format!("nav-{}-icon", item.id.as_str()), &item.icon);
            set_text(document, &format!("nav-{}-name", item.id.as_str()), &item.name);
            set_class(document, &format!("nav-{}", item.id.as_str()), "active", item.active);
            set_class(document, &format!("view-{}", item.id.as_str()), "hidden", !item.active);
        }
    }

    /// Transient "+N" next to the tap zone
    fn show_floating_number(document: &Document, amount: f64) {
        let Some(zone) = document.get_element_by_id("tapper-zone") else {
            return;
        };
        let Ok(el) = document.create_element("div") else {
            return;
        };
        el.set_class_name("floating-number");
        el.set_text_content(Some(&format!("+{}", format_number(amount))));
        if zone.append_child(&el).is_err() {
            return;
        }

        let closure = Closure::once(move || el.remove());
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                1500,
            );
        }
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let config = requested_theme();
        log::info!("{} starting...", config.name);

        match LocalStorageStore::open() {
            Ok(store) => start(config, store),
            Err(e) => {
                log::warn!("{}; progress will not be kept", e);
                start(config, MemoryStore::new());
            }
        }
    }

    fn start(config: EconomyConfig, store: impl Store + 'static) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to render into");
            return;
        };

        let engine = match Engine::initialize(config, store, SystemClock) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Invalid theme configuration: {}", e);
                return;
            }
        };
        let tick_ms = engine.config().tick_interval_ms;

        render(&document, engine.config(), engine.state(), engine.now_ms());

        let engine = Rc::new(RefCell::new(engine));
        {
            let document = document.clone();
            let mut g = engine.borrow_mut();
            let config = g.config().clone();
            g.subscribe(move |event, state| {
                if let EngineEvent::Tapped { amount } = event {
                    show_floating_number(&document, *amount);
                }
                render(&document, &config, state, js_sys::Date::now());
            });
        }
        ENGINE.with(|cell| *cell.borrow_mut() = Some(engine.clone()));

        // Periodic ticks and autosave
        {
            let engine = engine.clone();
            let interval = Interval::new(tick_ms, move || {
                if let Ok(mut g) = engine.try_borrow_mut() {
                    g.run_due();
                }
            });
            if interval.is_none() {
                log::error!("Could not start game timer");
            }
            TIMER.with(|cell| *cell.borrow_mut() = interval);
        }

        setup_click_delegation(&document, engine.clone());
        setup_save_on_unload(engine);

        log::info!("Tap Economy running!");
    }

    fn setup_click_delegation(document: &Document, engine: Rc<RefCell<Engine>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            else {
                return;
            };
            let Ok(Some(el)) = target.closest("[data-action]") else {
                return;
            };
            let Some(action) = el.get_attribute("data-action") else {
                return;
            };
            let payload = el.get_attribute("data-payload");
            if let Some(command) = Command::from_action(&action, payload.as_deref()) {
                if let Ok(mut g) = engine.try_borrow_mut() {
                    g.dispatch(command);
                }
            }
        });
        let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_save_on_unload(engine: Rc<RefCell<Engine>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Ok(mut g) = engine.try_borrow_mut() else {
                return;
            };
            if let Err(e) = g.save() {
                log::error!("Save on unload failed: {}", e);
            }
        });
        let _ = window.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let theme = std::env::args()
        .nth(1)
        .unwrap_or_else(|| tap_economy::themes::DEFAULT_THEME.to_string());
    let Some(config) = tap_economy::themes::by_id(&theme) else {
        log::error!("Unknown theme `{}`", theme);
        std::process::exit(1);
    };

    log::info!("{} (native) starting...", config.name);
    log::info!("Native mode runs a scripted session - run with `trunk serve` for the web version");

    scripted_session(config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a short session on a virtual clock, then come back two hours later
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session(config: tap_economy::EconomyConfig) {
    use tap_economy::{
        Clock, Engine, LoadOutcome, ManualClock, MemoryStore, PurchaseOutcome, SystemClock,
        format_number, view,
    };

    let clock = ManualClock::new(SystemClock.now_ms());
    let store = MemoryStore::new();
    let mut engine = match Engine::initialize(config.clone(), store.clone(), clock.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid theme configuration: {}", e);
            std::process::exit(1);
        }
    };

    for _ in 0..600 {
        engine.tap();
        // Buy whatever is cheapest and affordable
        let cheapest = config
            .upgrades
            .iter()
            .filter_map(|u| engine.upgrade_cost(&u.id).map(|cost| (u.id.clone(), cost)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((id, _)) = cheapest {
            if let PurchaseOutcome::Purchased { level, cost } = engine.purchase_upgrade(&id) {
                log::info!("Bought {} level {} for {}", id, level, format_number(cost));
            }
        }
    }

    // Ten minutes of idling with the timers running
    for _ in 0..600 {
        clock.advance_secs(1.0);
        engine.run_due();
    }
    if let Err(e) = engine.shutdown() {
        log::error!("Final save failed: {}", e);
    }
    let before = engine.state().currency;
    drop(engine);

    clock.advance_secs(2.0 * 3600.0);
    let engine = match Engine::initialize(config.clone(), store, clock.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid theme configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let LoadOutcome::Restored {
        offline_earnings, ..
    } = engine.load_outcome()
    {
        println!(
            "Offline for 2h: +{} {}",
            format_number(*offline_earnings),
            config.currency_name
        );
    }

    let stats = view::stats(engine.state(), clock.now_ms());
    println!(
        "{}: {} -> {} {} ({}/h), {} taps, {} generated",
        config.name,
        format_number(before),
        format_number(engine.state().currency),
        config.currency_name,
        format_number(engine.state().currency_per_hour),
        stats.total_taps,
        stats.total_generated,
    );
}
