// ============================================================================
// TerminalSession : acquisition / restauration du terminal
// ============================================================================
// Le terminal est une ressource exclusive : raw mode + alternate screen.
// Il doit être rendu dans son état normal sur TOUS les chemins de sortie.
//
// CONCEPTS RUST :
// 1. RAII : la restauration est dans Drop, donc garantie (return, ?, panic)
// 2. Trait TerminalControl : les effets sur le vrai terminal sont isolés,
//    la session se teste avec un TestBackend et un contrôle factice
// 3. Panic hook : restaure le terminal AVANT que le message de panic
//    s'affiche, uniquement si une session est encore active
// ============================================================================

use std::io::{self, IsTerminal, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use tracing::{debug, error};

use crate::error::ChartError;

static PANIC_HOOK: Once = Once::new();

/// Vrai entre l'activation du raw mode et la restauration du vrai terminal
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

// ============================================================================
// TerminalControl : effets de bord sur le terminal
// ============================================================================

/// Modes du terminal activés par une session
pub trait TerminalControl {
    /// Active le raw mode
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    /// Passe sur l'écran alternatif
    fn enter_alternate_screen(&mut self) -> io::Result<()>;

    /// Défait tout ce qui a été activé (best effort, jamais de panic)
    fn restore(&mut self);
}

/// Contrôle du vrai terminal via crossterm
#[derive(Debug, Default)]
pub struct CrosstermControl;

impl TerminalControl for CrosstermControl {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        SESSION_ACTIVE.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> io::Result<()> {
        execute!(io::stdout(), EnterAlternateScreen)
    }

    fn restore(&mut self) {
        SESSION_ACTIVE.store(false, Ordering::SeqCst);
        if let Err(e) = disable_raw_mode() {
            error!(error = ?e, "Failed to disable raw mode");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            error!(error = ?e, "Failed to leave alternate screen");
        }
    }
}

// ============================================================================
// TerminalSession
// ============================================================================

/// Session d'affichage plein écran, restaurée automatiquement au Drop
pub struct TerminalSession<B: Backend = CrosstermBackend<Stdout>, C: TerminalControl = CrosstermControl> {
    terminal: Terminal<B>,
    control: C,
}

impl TerminalSession {
    /// Acquiert le vrai terminal (raw mode + alternate screen)
    ///
    /// # Erreurs
    /// * `ChartError::DisplayInit` - stdout n'est pas un terminal, ou
    ///   crossterm n'a pas pu configurer le terminal
    pub fn acquire() -> Result<Self, ChartError> {
        if !io::stdout().is_terminal() {
            return Err(ChartError::DisplayInit(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdout is not a terminal",
            )));
        }

        install_panic_hook();

        debug!("Setting up terminal");
        Self::acquire_with(CrosstermControl, || {
            Terminal::new(CrosstermBackend::new(io::stdout()))
        })
    }
}

impl<B: Backend, C: TerminalControl> TerminalSession<B, C> {
    /// Acquiert une session avec un contrôle et un backend donnés
    ///
    /// Si une étape échoue après le raw mode, tout est défait avant de
    /// retourner `ChartError::DisplayInit`.
    pub fn acquire_with<F>(mut control: C, make_terminal: F) -> Result<Self, ChartError>
    where
        F: FnOnce() -> io::Result<Terminal<B>>,
    {
        control.enable_raw_mode().map_err(ChartError::DisplayInit)?;

        if let Err(e) = control.enter_alternate_screen() {
            control.restore();
            return Err(ChartError::DisplayInit(e));
        }

        match make_terminal() {
            Ok(terminal) => Ok(Self { terminal, control }),
            Err(e) => {
                control.restore();
                Err(ChartError::DisplayInit(e))
            }
        }
    }

    /// Dessine une frame complète
    pub fn draw<F>(&mut self, render: F) -> Result<(), ChartError>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal
            .draw(render)
            .map(|_| ())
            .map_err(ChartError::Display)
    }
}

impl<B: Backend, C: TerminalControl> Drop for TerminalSession<B, C> {
    fn drop(&mut self) {
        debug!("Restoring terminal");
        if let Err(e) = self.terminal.show_cursor() {
            error!(error = ?e, "Failed to show cursor");
        }
        self.control.restore();
    }
}

/// Restaure le vrai terminal si une session est encore active
///
/// Retourne vrai si une restauration a eu lieu.
fn restore_if_active() -> bool {
    if SESSION_ACTIVE.load(Ordering::SeqCst) {
        CrosstermControl.restore();
        true
    } else {
        false
    }
}

/// Chaîne un hook qui restaure le terminal avant le hook par défaut
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_if_active();
            original(info);
        }));
    });
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ratatui::backend::TestBackend;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Contrôle factice : journalise les appels, peut échouer sur une étape
    struct FakeControl {
        log: Log,
        fail_raw_mode: bool,
        fail_alternate_screen: bool,
    }

    impl FakeControl {
        fn new(log: &Log) -> Self {
            Self {
                log: log.clone(),
                fail_raw_mode: false,
                fail_alternate_screen: false,
            }
        }
    }

    impl TerminalControl for FakeControl {
        fn enable_raw_mode(&mut self) -> io::Result<()> {
            if self.fail_raw_mode {
                return Err(io::Error::new(io::ErrorKind::Other, "no tty"));
            }
            self.log.borrow_mut().push("raw");
            Ok(())
        }

        fn enter_alternate_screen(&mut self) -> io::Result<()> {
            if self.fail_alternate_screen {
                return Err(io::Error::new(io::ErrorKind::Other, "unsupported"));
            }
            self.log.borrow_mut().push("alternate");
            Ok(())
        }

        fn restore(&mut self) {
            self.log.borrow_mut().push("restore");
        }
    }

    fn test_terminal() -> io::Result<Terminal<TestBackend>> {
        Terminal::new(TestBackend::new(40, 20))
    }

    /// Acquiert, dessine, puis sort en erreur par `?`
    fn draw_then_fail(log: &Log) -> Result<(), ChartError> {
        let mut session = TerminalSession::acquire_with(FakeControl::new(log), test_terminal)?;
        session.draw(|_| {})?;
        Err(ChartError::Display(io::Error::new(io::ErrorKind::Other, "read failed")))?;
        Ok(())
    }

    #[test]
    fn test_restore_runs_after_early_error_return() {
        let log = Log::default();

        let err = draw_then_fail(&log).unwrap_err();

        assert!(matches!(err, ChartError::Display(_)));
        assert_eq!(*log.borrow(), vec!["raw", "alternate", "restore"]);
    }

    #[test]
    fn test_restore_runs_on_normal_drop() {
        let log = Log::default();
        {
            let mut session = TerminalSession::acquire_with(FakeControl::new(&log), test_terminal).unwrap();
            session.draw(|_| {}).unwrap();
            assert_eq!(*log.borrow(), vec!["raw", "alternate"]);
        }
        assert_eq!(*log.borrow(), vec!["raw", "alternate", "restore"]);
    }

    #[test]
    fn test_alternate_screen_failure_undoes_raw_mode() {
        let log = Log::default();
        let mut control = FakeControl::new(&log);
        control.fail_alternate_screen = true;

        let err = TerminalSession::acquire_with(control, test_terminal).err().unwrap();

        assert!(matches!(err, ChartError::DisplayInit(_)));
        assert_eq!(*log.borrow(), vec!["raw", "restore"]);
    }

    #[test]
    fn test_backend_failure_undoes_raw_mode() {
        let log = Log::default();

        let err = TerminalSession::<TestBackend, _>::acquire_with(FakeControl::new(&log), || {
            Err(io::Error::new(io::ErrorKind::Other, "backend"))
        })
        .err()
        .unwrap();

        assert!(matches!(err, ChartError::DisplayInit(_)));
        assert_eq!(*log.borrow(), vec!["raw", "alternate", "restore"]);
    }

    #[test]
    fn test_raw_mode_failure_has_nothing_to_undo() {
        let log = Log::default();
        let mut control = FakeControl::new(&log);
        control.fail_raw_mode = true;

        let err = TerminalSession::acquire_with(control, test_terminal).err().unwrap();

        assert!(matches!(err, ChartError::DisplayInit(_)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_panic_hook_is_noop_without_active_session() {
        // Aucune session crossterm n'est ouverte dans les tests
        assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
        assert!(!restore_if_active());
    }
}
