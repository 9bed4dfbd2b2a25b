//! Ticket kiosk for a tourist attraction.
//!
//! Hooks only see the state they fire in, so everything they need (the
//! inserted card, ticket count, pending follow-ups) lives in one shared
//! [`Kiosk`] context captured by the closures. Transitions a hook wants to
//! trigger next are queued on the context and performed by the host once
//! the current transition has returned.

use labelled_fsm::core::{Action, Definition, Gate};
use labelled_fsm::labels;
use labelled_fsm::machine::{Machine, MachineError};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::EnvFilter;

const KIOSK: &str = "
    idle -> waiting (system_ready);
    waiting -> waiting (cancel_eject);
    waiting -> wait_for_pin (insert_card);

    wait_for_pin -> checking (input_pin);
    wait_for_pin -> waiting (cancel_eject);

    checking -> pending (preapprove);
    checking -> rejected (insufficient_funds);
    rejected -> waiting (cancel_eject);

    pending -> checking (add_ticket);   # re-reserve for the larger order
    pending -> pending (remove_ticket);
    pending -> purchased (confirm_purchase);
    pending -> waiting (cancel_eject);

    purchased -> waiting (print_spooled);
";

/// Prices are in cents.
const TICKET_PRICE: i64 = 450;
const MAX_TICKETS: u32 = 5;

labels! {
    enum Screen {
        Idle => "idle",
        Waiting => "waiting",
        WaitForPin => "wait_for_pin",
        Checking => "checking",
        Pending => "pending",
        Rejected => "rejected",
        Purchased => "purchased",
    }
}

labels! {
    enum Event {
        SystemReady => "system_ready",
        CancelEject => "cancel_eject",
        InsertCard => "insert_card",
        InputPin => "input_pin",
        AddTicket => "add_ticket",
        RemoveTicket => "remove_ticket",
        ConfirmPurchase => "confirm_purchase",
        // Raised by the kiosk itself, never by a customer.
        Preapprove => "preapprove",
        InsufficientFunds => "insufficient_funds",
        PrintSpooled => "print_spooled",
    }
}

#[derive(Debug)]
struct DebitCard {
    kind: &'static str,
    pin: &'static str,
    available: i64,
    reserved: i64,
}

impl DebitCard {
    fn new(kind: &'static str, pin: &'static str, available: i64, reserved: i64) -> Self {
        Self {
            kind,
            pin,
            available,
            reserved,
        }
    }
}

#[derive(Debug, Default)]
struct Kiosk {
    transaction: u32,
    tickets: u32,
    cards: BTreeMap<&'static str, DebitCard>,
    inserted: Option<&'static str>,
    pin_entry: Option<&'static str>,
    follow_ups: VecDeque<Event>,
}

impl Kiosk {
    fn total(&self) -> i64 {
        i64::from(self.tickets) * TICKET_PRICE
    }

    fn card(&self) -> Option<&DebitCard> {
        self.cards.get(self.inserted?)
    }

    fn card_mut(&mut self) -> Option<&mut DebitCard> {
        self.cards.get_mut(self.inserted?)
    }

    /// Move `amount` between the available and reserved balances.
    fn reserve(&mut self, amount: i64) {
        if let Some(card) = self.card_mut() {
            card.available -= amount;
            card.reserved += amount;
        }
    }

    fn eject(&mut self) {
        if self.inserted.take().is_some() {
            println!("Ejector: CARD_EJECTED");
        }
        self.pin_entry = None;
    }

    /// Why `event` may not fire right now, if it may not.
    fn refusal(&self, event: Event) -> Option<String> {
        let Some(card) = self.card() else {
            return Some("No card inserted".to_string());
        };
        match event {
            Event::InsertCard if card.kind != "VISA" => Some(format!(
                "Unsupported Card Type. Nobody supports {}, please enter a VISA card!",
                card.kind
            )),
            Event::InsertCard if card.pin.len() != 4 => {
                Some("Unable to read card, corrupted pin code? Please try again.".to_string())
            }
            Event::InputPin => match self.pin_entry {
                None => Some("Missing Pin. Please try again!".to_string()),
                Some(guess) if guess != card.pin => {
                    Some("Invalid Pin. Please try again!".to_string())
                }
                Some(_) => None,
            },
            Event::AddTicket if self.tickets >= MAX_TICKETS => {
                Some(format!("Maximum Tickets per Customer is {MAX_TICKETS}"))
            }
            Event::AddTicket if card.available < TICKET_PRICE => {
                Some("Not enough funds to add another ticket.".to_string())
            }
            Event::RemoveTicket if self.tickets <= 1 => Some("Purchasing 1 Ticket".to_string()),
            Event::Preapprove if card.available < self.total() => {
                Some("Insufficient Funds on this Card.".to_string())
            }
            _ => None,
        }
    }
}

type Context = Arc<Mutex<Kiosk>>;

fn lock(context: &Context) -> MutexGuard<'_, Kiosk> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}

fn hook<F>(context: &Context, effect: F) -> Action
where
    F: Fn(&mut Kiosk) + Send + Sync + 'static,
{
    let context = Arc::clone(context);
    Action::new(move |_| effect(&mut *lock(&context)))
}

fn gate(context: &Context, event: Event) -> Gate {
    let context = Arc::clone(context);
    Gate::new(move |_| lock(&context).refusal(event).is_none())
}

fn show(lines: &[&str]) {
    println!("Display: ----------------------------------------");
    for line in lines {
        println!("Display: {line}");
    }
}

fn load_definition() -> Result<Definition, Box<dyn std::error::Error>> {
    let definition: Definition = KIOSK.parse()?;
    definition.validate()?;

    for screen in Screen::ALL {
        if definition.state(screen.label()).is_none() {
            return Err(format!("kiosk definition lacks state {screen}").into());
        }
    }
    Ok(definition)
}

/// Attach the kiosk's hooks. Runs after the machine is bound, so it only
/// needs shared access to the definition.
fn wire_hooks(definition: &Definition, context: &Context) {
    let on_entry = |definition: &Definition, screen: Screen, action: Action| {
        if let Some(state) = definition.state(screen.label()) {
            state.set_entry_action(action);
        }
    };
    let on_exit = |definition: &Definition, screen: Screen, action: Action| {
        if let Some(state) = definition.state(screen.label()) {
            state.set_exit_action(action);
        }
    };

    on_exit(definition, Screen::Idle, hook(context, |_| println!("Display: System Ready")));
    on_entry(
        definition,
        Screen::Waiting,
        hook(context, |_| {
            show(&["Please insert your card to begin"]);
            println!("Display: Ticket price is ${:.2}", TICKET_PRICE as f64 / 100.0);
        }),
    );
    on_entry(
        definition,
        Screen::WaitForPin,
        hook(context, |_| show(&["Card inserted, please enter your pin"])),
    );
    on_exit(
        definition,
        Screen::WaitForPin,
        hook(context, |kiosk| {
            kiosk.tickets = 1;
            kiosk.transaction += 1;
        }),
    );
    on_entry(
        definition,
        Screen::Checking,
        hook(context, |kiosk| {
            show(&["Checking for sufficient funds"]);
            kiosk.follow_ups.push_back(Event::Preapprove);
        }),
    );
    on_entry(
        definition,
        Screen::Rejected,
        hook(context, |kiosk| {
            println!("Display: Insufficient Funds on this Card. Please use a different card...");
            kiosk.follow_ups.push_back(Event::CancelEject);
        }),
    );
    on_entry(
        definition,
        Screen::Purchased,
        hook(context, |_| show(&["Purchase Complete! Printing Receipt..."])),
    );
    on_exit(
        definition,
        Screen::Purchased,
        hook(context, |kiosk| {
            println!("Printer: Transaction {}", kiosk.transaction);
            println!("Printer: {} Ticket(s)", kiosk.tickets);
            println!("Printer: Total: ${:.2}", kiosk.total() as f64 / 100.0);
        }),
    );

    let wire = |screen: Screen, event: Event, gated: bool, action: Option<Action>| {
        if let Some(transition) = definition.transition(screen.label(), event.label()) {
            if gated {
                transition.set_gate(gate(context, event));
            }
            if let Some(action) = action {
                transition.set_action(action);
            }
        }
    };

    let summary = |kiosk: &Kiosk| {
        println!("Display: ----------------------------------------");
        println!("Display: Currently purchasing {} ticket(s).", kiosk.tickets);
        println!("Display: Total: ${:.2}", kiosk.total() as f64 / 100.0);
    };

    wire(Screen::Waiting, Event::InsertCard, true, None);
    wire(Screen::WaitForPin, Event::InputPin, true, None);
    wire(
        Screen::Checking,
        Event::Preapprove,
        true,
        Some(hook(context, move |kiosk| {
            let total = kiosk.total();
            kiosk.reserve(total);
            summary(kiosk);
        })),
    );
    wire(
        Screen::Pending,
        Event::AddTicket,
        true,
        Some(hook(context, |kiosk| {
            // Release the current reservation; preapproval reserves the new total.
            let total = kiosk.total();
            kiosk.reserve(-total);
            kiosk.tickets += 1;
        })),
    );
    wire(
        Screen::Pending,
        Event::RemoveTicket,
        true,
        Some(hook(context, move |kiosk| {
            kiosk.tickets -= 1;
            kiosk.reserve(-TICKET_PRICE);
            summary(kiosk);
        })),
    );
    wire(
        Screen::Pending,
        Event::ConfirmPurchase,
        false,
        Some(hook(context, |kiosk| {
            let total = kiosk.total();
            if let Some(card) = kiosk.card_mut() {
                card.reserved -= total;
            }
            kiosk.eject();
            kiosk.follow_ups.push_back(Event::PrintSpooled);
        })),
    );
    wire(
        Screen::Pending,
        Event::CancelEject,
        false,
        Some(hook(context, |kiosk| {
            let total = kiosk.total();
            kiosk.reserve(-total);
            kiosk.tickets = 0;
            kiosk.eject();
        })),
    );
    wire(
        Screen::WaitForPin,
        Event::CancelEject,
        false,
        Some(hook(context, Kiosk::eject)),
    );
    wire(
        Screen::Rejected,
        Event::CancelEject,
        false,
        Some(hook(context, Kiosk::eject)),
    );
}

/// Host side of the kiosk: submits customer events and settles the
/// follow-ups the hooks queue.
struct Session<'d> {
    machine: Machine<'d>,
    context: Context,
}

impl Session<'_> {
    fn submit(&mut self, event: Event) {
        match self.fire(event) {
            Ok(()) => {}
            Err(err) if err.is_recoverable() => {
                tracing::info!(%event, code = err.error_code(), "event refused");
            }
            Err(err) => tracing::error!(%event, error = %err, "kiosk fault"),
        }
        println!("[Action Logged]");
    }

    fn insert_card(&mut self, card: &'static str) {
        lock(&self.context).inserted = Some(card);
        self.submit(Event::InsertCard);
        if !self.machine.is_in(Screen::WaitForPin) {
            lock(&self.context).eject();
        }
    }

    fn input_pin(&mut self, pin: &'static str) {
        lock(&self.context).pin_entry = Some(pin);
        self.submit(Event::InputPin);
    }

    fn fire(&mut self, event: Event) -> Result<(), MachineError> {
        if let Err(err) = self.machine.perform_transition(event) {
            if let MachineError::CannotPerformTransition { .. } = err {
                if let Some(reason) = lock(&self.context).refusal(event) {
                    println!("Display: {reason}");
                }
            }
            return Err(err);
        }
        self.settle()
    }

    /// Perform queued follow-ups until none remain.
    fn settle(&mut self) -> Result<(), MachineError> {
        loop {
            let Some(event) = lock(&self.context).follow_ups.pop_front() else {
                return Ok(());
            };
            tracing::debug!(%event, state = %self.machine.current_state(), "follow-up");
            match (event, self.machine.perform_transition(event)) {
                (_, Ok(())) => {}
                (Event::Preapprove, Err(MachineError::CannotPerformTransition { .. })) => {
                    self.machine.perform_transition(Event::InsufficientFunds)?;
                }
                (_, Err(err)) => return Err(err),
            }
        }
    }

    fn balance(&self, card: &str) {
        let kiosk = lock(&self.context);
        if let Some(card) = kiosk.cards.get(card) {
            println!(
                "Balance: ${:.2} available, ${:.2} reserved",
                card.available as f64 / 100.0,
                card.reserved as f64 / 100.0
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let context: Context = Arc::default();
    {
        let mut kiosk = lock(&context);
        kiosk.cards.insert("of_course", DebitCard::new("AmEx", "1234", 8_500, 0));
        kiosk.cards.insert("hacker", DebitCard::new("VISA", "", 9_999_900, -9_999_900));
        kiosk.cards.insert("broke", DebitCard::new("VISA", "1234", 100, 0));
        kiosk.cards.insert("high_roller", DebitCard::new("VISA", "1234", 100_000, 90_000));
        kiosk.cards.insert("simple", DebitCard::new("VISA", "1234", 2_000, 0));
    }

    let definition = load_definition()?;
    println!("{}", definition.graph_viz());

    let machine = Machine::new(&definition)?;
    wire_hooks(&definition, &context);
    let mut session = Session { machine, context };

    session.submit(Event::SystemReady);
    println!("Display: [Goes to sleep because nobody is around]\n");
    println!("Let's wake up the machine!");
    session.submit(Event::CancelEject);

    println!("\nLet's use this card:");
    session.insert_card("of_course");

    println!("Hah, had to try. Let's try this card next");
    session.insert_card("broke");
    session.input_pin("1111");
    println!("So embarrassing, what was that pin again?");
    session.input_pin("1234");

    println!("Oops. *Run home to get other cards*\n\nSuddenly, a shady customer walks up");
    session.insert_card("hacker");
    println!("*Shady customer runs away*");

    println!("\nA well dressed person appears, they need to buy 10 tickets");
    session.insert_card("high_roller");
    session.input_pin("1234");
    for _ in 0..5 {
        session.submit(Event::AddTicket);
    }
    session.submit(Event::ConfirmPurchase);
    println!("*Smart person thinks for a second, and tries again*");
    session.insert_card("high_roller");
    session.input_pin("1234");
    for _ in 0..4 {
        session.submit(Event::AddTicket);
    }
    session.submit(Event::ConfirmPurchase);

    println!("\nAnd we're back with our good card");
    session.insert_card("simple");
    session.input_pin("1234");
    session.submit(Event::AddTicket);
    println!("*Oh no stupid sticky button*");
    for _ in 0..3 {
        session.submit(Event::AddTicket);
    }
    session.submit(Event::RemoveTicket);
    session.submit(Event::RemoveTicket);
    session.balance("simple");
    session.submit(Event::ConfirmPurchase);
    session.balance("simple");

    tracing::info!(
        state = %session.machine.current_state(),
        transitions = session.machine.history().len(),
        "kiosk idle"
    );
    Ok(())
}
