//! The interface to the particle samples consumed by the analysis, along with
//! a simple in-memory implementation.

use balance_nostd_internal::ParticleRecord;

use crate::Error;

/// The particles of a single event that belong to one role
pub type EventList = Vec<ParticleRecord>;

/// The 4 species roles of a balance function analysis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    A,
    ABar,
    B,
    BBar,
}

/// Distinguishes the events being analyzed from the pool used for event
/// mixing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPool {
    Same,
    Mixed,
}

/// A buffered source of particle samples.
///
/// The source is read in chunks. After `load_next_chunk` and
/// `load_next_mixed_chunk` are called, `role_collection` exposes the events
/// of the current chunk, grouped by role. Within a pool, the collections of
/// every role hold the same number of events and index `i` always refers to
/// the same event.
pub trait ParticleSampleSource {
    /// The nominal number of events per chunk (only used for progress
    /// reporting)
    fn event_buffer_size(&self) -> usize;

    /// `true` once there are no more chunks to load
    fn end_of_data(&self) -> bool;

    fn load_next_chunk(&mut self) -> Result<(), Error>;

    fn load_next_mixed_chunk(&mut self) -> Result<(), Error>;

    fn role_collection(&self, pool: EventPool, role: Role) -> &[EventList];
}

/// The particles of a set of events, partitioned by role
#[derive(Clone, Debug, Default)]
pub struct RoleCollections {
    a: Vec<EventList>,
    abar: Vec<EventList>,
    b: Vec<EventList>,
    bbar: Vec<EventList>,
}

impl RoleCollections {
    /// Partitions each event by species code. A particle with code `alpha`
    /// goes to role a and a particle with code `-alpha` goes to role ā (b and
    /// b̄ are handled the same way with `beta`).
    ///
    /// A particle may belong to more than one role. For example, when
    /// `beta == -alpha` the b collection holds the same particles as the ā
    /// collection. The conjugate of `i32::MIN` isn't representable, so its
    /// conjugate role is always empty.
    pub fn from_events(events: &[EventList], alpha: i32, beta: i32) -> Self {
        let select = |event: &EventList, code: Option<i32>| -> EventList {
            event
                .iter()
                .filter(|p| Some(p.monval) == code)
                .copied()
                .collect()
        };
        Self {
            a: events.iter().map(|ev| select(ev, Some(alpha))).collect(),
            abar: events.iter().map(|ev| select(ev, alpha.checked_neg())).collect(),
            b: events.iter().map(|ev| select(ev, Some(beta))).collect(),
            bbar: events.iter().map(|ev| select(ev, beta.checked_neg())).collect(),
        }
    }

    pub fn get(&self, role: Role) -> &[EventList] {
        match role {
            Role::A => &self.a,
            Role::ABar => &self.abar,
            Role::B => &self.b,
            Role::BBar => &self.bbar,
        }
    }

    pub fn n_events(&self) -> usize {
        self.a.len()
    }
}

/// A [`ParticleSampleSource`] that serves events that are already in memory.
///
/// The same-event stream is consumed `buffer_size` events at a time. The
/// mixed-event pool is also served `buffer_size` events at a time, but it
/// wraps around so that it never runs dry.
#[derive(Clone, Debug)]
pub struct InMemorySamples {
    events: Vec<EventList>,
    mixed_events: Vec<EventList>,
    buffer_size: usize,
    alpha: i32,
    beta: i32,
    cursor: usize,
    mixed_cursor: usize,
    current: RoleCollections,
    current_mixed: RoleCollections,
}

impl InMemorySamples {
    /// The events also serve as the mixed-event pool. Use
    /// [`InMemorySamples::with_mixed_events`] to provide a separate pool.
    pub fn new(
        events: Vec<EventList>,
        buffer_size: usize,
        alpha: i32,
        beta: i32,
    ) -> Result<Self, Error> {
        if buffer_size == 0 {
            return Err(Error::invalid_parameter(
                "buffer_size",
                0.0,
                "the event buffer must hold at least 1 event",
            ));
        }
        Ok(Self {
            mixed_events: events.clone(),
            events,
            buffer_size,
            alpha,
            beta,
            cursor: 0,
            mixed_cursor: 0,
            current: RoleCollections::default(),
            current_mixed: RoleCollections::default(),
        })
    }

    pub fn with_mixed_events(mut self, mixed_events: Vec<EventList>) -> Self {
        self.mixed_events = mixed_events;
        self.mixed_cursor = 0;
        self
    }
}

impl ParticleSampleSource for InMemorySamples {
    fn event_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn end_of_data(&self) -> bool {
        self.cursor >= self.events.len()
    }

    fn load_next_chunk(&mut self) -> Result<(), Error> {
        let stop = (self.cursor + self.buffer_size).min(self.events.len());
        self.current =
            RoleCollections::from_events(&self.events[self.cursor..stop], self.alpha, self.beta);
        self.cursor = stop;
        Ok(())
    }

    fn load_next_mixed_chunk(&mut self) -> Result<(), Error> {
        let n_pool = self.mixed_events.len();
        let n_load = self.buffer_size.min(n_pool);
        let chunk: Vec<EventList> = (0..n_load)
            .map(|i| self.mixed_events[(self.mixed_cursor + i) % n_pool].clone())
            .collect();
        if n_pool > 0 {
            self.mixed_cursor = (self.mixed_cursor + n_load) % n_pool;
        }
        self.current_mixed = RoleCollections::from_events(&chunk, self.alpha, self.beta);
        Ok(())
    }

    fn role_collection(&self, pool: EventPool, role: Role) -> &[EventList] {
        match pool {
            EventPool::Same => self.current.get(role),
            EventPool::Mixed => self.current_mixed.get(role),
        }
    }
}
