use super::PhraseLink;

/// A surface that renders phrase links.
///
/// Receives the complete ordered sequence on every publish, so implementations
/// should redraw from scratch.
pub trait PhraseListener {
    fn receive(&mut self, links: &[PhraseLink]);
}

impl<F> PhraseListener for F
where
    F: FnMut(&[PhraseLink]),
{
    fn receive(&mut self, links: &[PhraseLink]) {
        self(links)
    }
}

/// Forwards only the links carrying one code.
pub struct ByCode<L> {
    code: String,
    inner: L,
}

impl<L: PhraseListener> ByCode<L> {
    pub fn new(code: impl Into<String>, inner: L) -> Self {
        Self {
            code: code.into(),
            inner,
        }
    }
}

impl<L: PhraseListener> PhraseListener for ByCode<L> {
    fn receive(&mut self, links: &[PhraseLink]) {
        let matching: Vec<PhraseLink> = links
            .iter()
            .filter(|link| link.code == self.code)
            .cloned()
            .collect();
        self.inner.receive(&matching);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct Publisher {
    listeners: Vec<(ListenerId, Box<dyn PhraseListener>)>,
    next_id: u64,
    last_published: Vec<PhraseLink>,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl PhraseListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was registered under `id`.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Hands `links` to every listener and keeps them as the last snapshot.
    pub fn publish(&mut self, links: &[PhraseLink]) {
        log::debug!(
            target: "notetaker::publish",
            "publishing {} phrase(s) to {} listener(s)",
            links.len(),
            self.listeners.len()
        );
        for (_, listener) in &mut self.listeners {
            listener.receive(links);
        }
        self.last_published = links.to_vec();
    }

    pub fn last_published(&self) -> &[PhraseLink] {
        &self.last_published
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("listeners", &self.listeners.len())
            .field("last_published", &self.last_published)
            .finish()
    }
}
