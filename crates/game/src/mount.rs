//! Mount/unmount bookkeeping for the window-bound session.
//!
//! A session owns the surface, the GPU resources and the scene. It exists only
//! between a mount and the matching unmount; dropping it releases everything
//! it acquired.

/// Holds at most one live session and counts mount/unmount transitions.
#[derive(Debug)]
pub struct Mount<S> {
    session: Option<S>,
    mounts: u64,
    unmounts: u64,
}

impl<S> Default for Mount<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Mount<S> {
    pub fn new() -> Self {
        Self {
            session: None,
            mounts: 0,
            unmounts: 0,
        }
    }

    /// Create the session with `init` unless one is already mounted.
    /// Returns whether a new session was created.
    pub fn mount_with<E>(&mut self, init: impl FnOnce() -> Result<S, E>) -> Result<bool, E> {
        if self.session.is_some() {
            return Ok(false);
        }
        self.session = Some(init()?);
        self.mounts += 1;
        log::info!("Session mounted ({} so far)", self.mounts);
        Ok(true)
    }

    /// Drop the session, if any. Safe to call repeatedly.
    pub fn unmount(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                drop(session);
                self.unmounts += 1;
                log::info!("Session unmounted");
                true
            }
            None => false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    pub fn mounts(&self) -> u64 {
        self.mounts
    }

    pub fn unmounts(&self) -> u64 {
        self.unmounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts live instances through a shared counter.
    struct Tracked(Rc<Cell<i32>>);

    impl Tracked {
        fn new(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Self(live.clone())
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    #[test]
    fn unmount_without_mount_is_a_noop() {
        let mut mount: Mount<Tracked> = Mount::new();
        assert!(!mount.unmount());
        assert_eq!(mount.unmounts(), 0);
        assert!(mount.session_mut().is_none());
    }

    #[test]
    fn repeated_cycles_release_everything() {
        let live = Rc::new(Cell::new(0));
        let mut mount = Mount::new();
        for cycle in 1..=5 {
            let created = mount.mount_with(|| Ok::<_, ()>(Tracked::new(&live)));
            assert_eq!(created, Ok(true));
            assert_eq!(live.get(), 1);
            assert!(mount.unmount());
            assert!(!mount.unmount());
            assert_eq!(live.get(), 0);
            assert_eq!(mount.mounts(), cycle);
            assert_eq!(mount.unmounts(), cycle);
        }
    }

    #[test]
    fn second_mount_keeps_existing_session() {
        let live = Rc::new(Cell::new(0));
        let mut mount = Mount::new();
        assert_eq!(mount.mount_with(|| Ok::<_, ()>(Tracked::new(&live))), Ok(true));
        assert_eq!(mount.mount_with(|| Ok::<_, ()>(Tracked::new(&live))), Ok(false));
        assert_eq!(live.get(), 1);
        assert_eq!(mount.mounts(), 1);
    }

    #[test]
    fn failed_mount_leaves_nothing_behind() {
        let mut mount: Mount<Tracked> = Mount::new();
        assert_eq!(mount.mount_with(|| Err("no window")), Err("no window"));
        assert!(!mount.is_mounted());
        assert_eq!(mount.mounts(), 0);
        assert!(!mount.unmount());
    }
}
