//! Table actor: an isolated Tokio task that owns one session.
//!
//! The actor reads commands from an mpsc channel and applies each one to
//! its [`Session`] to completion before reading the next. Callers talk to
//! it through a cloneable [`TableHandle`]; replies come back on oneshot
//! channels.
//!
//! After a phase transition the session stays busy until a
//! `ReleaseBusy` command, which the actor queues behind whatever was
//! already waiting. Turn and phase triggers that were queued during the
//! transition are therefore rejected with [`TableError::Busy`] instead of
//! re-entering it.

use std::time::Duration;

use roundkeeper_engine::{
    ConditionLifecycle, ElementPool, ElementState, NoConditions, Phase, PhaseTransition,
    RosterCollaborator, Session,
};
use roundkeeper_model::{
    Element, Figure, FigureId, MonsterData, ObjectiveData, ScenarioData, SectionData, TableId,
};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::TableError;

/// The game-specific hooks a table calls into.
///
/// Roster collaborators run in order on every phase transition; the
/// condition lifecycle runs on every turn-pointer step.
pub struct Collaborators {
    pub rosters: Vec<Box<dyn RosterCollaborator + Send>>,
    pub conditions: Box<dyn ConditionLifecycle + Send>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            rosters: Vec::new(),
            conditions: Box::new(NoConditions),
        }
    }
}

/// A copy of a table's state, sent on request and to subscribers after
/// every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub phase: Phase,
    pub round: u32,
    pub level: u32,
    pub scenario_level: u32,
    pub roster: Vec<Figure>,
    pub active: Option<FigureId>,
    pub elements: ElementPool,
    pub busy: bool,
    pub ready_to_advance: bool,
    pub total_elapsed: Duration,
    pub session_elapsed: Duration,
}

/// Channel sender for delivering snapshots to an observer.
pub type SnapshotSender = mpsc::UnboundedSender<TableSnapshot>;

type Reply<T> = oneshot::Sender<T>;

/// Commands sent to a table actor through its channel.
pub(crate) enum TableCommand {
    AdvancePhase {
        reply: Reply<Result<PhaseTransition, TableError>>,
    },
    ToggleFigure {
        figure: FigureId,
        reply: Reply<Result<(), TableError>>,
    },
    ToggleElement {
        element: Element,
        reply: Reply<ElementState>,
    },
    SetLevel {
        level: u32,
        reply: Reply<()>,
    },
    SetInitiative {
        figure: FigureId,
        initiative: u32,
        reply: Reply<Result<(), TableError>>,
    },
    SetScenario {
        scenario: Option<ScenarioData>,
        reply: Reply<Result<(), TableError>>,
    },
    AddSection {
        section: SectionData,
        reply: Reply<Result<bool, TableError>>,
    },
    ResetRound {
        reply: Reply<()>,
    },
    AddCharacter {
        name: String,
        edition: String,
        level: u32,
        reply: Reply<FigureId>,
    },
    AddMonster {
        data: MonsterData,
        reply: Reply<FigureId>,
    },
    AddObjective {
        data: ObjectiveData,
        reply: Reply<FigureId>,
    },
    Snapshot {
        reply: Reply<TableSnapshot>,
    },
    Subscribe {
        sender: SnapshotSender,
    },
    /// Queued by the actor itself after a phase transition.
    ReleaseBusy,
    Shutdown,
}

/// Handle to a running table actor.
///
/// Cheap to clone; the [`TableManager`](crate::TableManager) holds one per
/// table.
#[derive(Clone)]
pub struct TableHandle {
    table_id: TableId,
    sender: mpsc::Sender<TableCommand>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Moves the round to its other phase. Rejected with
    /// [`TableError::Busy`] while the previous transition is settling.
    pub async fn advance_phase(&self) -> Result<PhaseTransition, TableError> {
        self.request(|reply| TableCommand::AdvancePhase { reply })
            .await?
    }

    /// Moves the turn pointer to `figure`. Rejected with
    /// [`TableError::Busy`] while a phase transition is settling.
    pub async fn toggle_figure(&self, figure: FigureId) -> Result<(), TableError> {
        self.request(|reply| TableCommand::ToggleFigure { figure, reply })
            .await?
    }

    pub async fn toggle_element(&self, element: Element) -> Result<ElementState, TableError> {
        self.request(|reply| TableCommand::ToggleElement { element, reply })
            .await
    }

    pub async fn set_level(&self, level: u32) -> Result<(), TableError> {
        self.request(|reply| TableCommand::SetLevel { level, reply })
            .await
    }

    pub async fn set_initiative(
        &self,
        figure: FigureId,
        initiative: u32,
    ) -> Result<(), TableError> {
        self.request(|reply| TableCommand::SetInitiative {
            figure,
            initiative,
            reply,
        })
        .await?
    }

    pub async fn set_scenario(&self, scenario: Option<ScenarioData>) -> Result<(), TableError> {
        self.request(|reply| TableCommand::SetScenario { scenario, reply })
            .await?
    }

    /// Opens a section. `Ok(false)` means it was already open.
    pub async fn add_section(&self, section: SectionData) -> Result<bool, TableError> {
        self.request(|reply| TableCommand::AddSection { section, reply })
            .await?
    }

    pub async fn reset_round(&self) -> Result<(), TableError> {
        self.request(|reply| TableCommand::ResetRound { reply })
            .await
    }

    pub async fn add_character(
        &self,
        name: impl Into<String>,
        edition: impl Into<String>,
        level: u32,
    ) -> Result<FigureId, TableError> {
        let (name, edition) = (name.into(), edition.into());
        self.request(|reply| TableCommand::AddCharacter {
            name,
            edition,
            level,
            reply,
        })
        .await
    }

    pub async fn add_monster(&self, data: MonsterData) -> Result<FigureId, TableError> {
        self.request(|reply| TableCommand::AddMonster { data, reply })
            .await
    }

    pub async fn add_objective(&self, data: ObjectiveData) -> Result<FigureId, TableError> {
        self.request(|reply| TableCommand::AddObjective { data, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<TableSnapshot, TableError> {
        self.request(|reply| TableCommand::Snapshot { reply })
            .await
    }

    /// Registers an observer. It receives the current state right away
    /// and a fresh snapshot after every command that changes the table.
    pub async fn subscribe(&self, sender: SnapshotSender) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Subscribe { sender })
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))
    }

    /// Tells the table to shut down.
    pub async fn shutdown(&self) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Shutdown)
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> TableCommand,
    ) -> Result<T, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))?;
        reply_rx
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))
    }
}

/// The internal table actor state. Runs inside a Tokio task.
struct TableActor {
    table_id: TableId,
    session: Session,
    collaborators: Collaborators,
    subscribers: Vec<SnapshotSender>,
    receiver: mpsc::Receiver<TableCommand>,
    /// Weak so that dropping every handle still ends the actor.
    commands: mpsc::WeakSender<TableCommand>,
}

impl TableActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(table_id = %self.table_id, "table actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                TableCommand::AdvancePhase { reply } => {
                    let result = self.handle_advance_phase();
                    let _ = reply.send(result);
                }
                TableCommand::ToggleFigure { figure, reply } => {
                    let result = self.handle_toggle_figure(figure);
                    let _ = reply.send(result);
                }
                TableCommand::ToggleElement { element, reply } => {
                    let _ = reply.send(self.session.toggle_element(element));
                }
                TableCommand::SetLevel { level, reply } => {
                    self.session.set_level(level);
                    let _ = reply.send(());
                }
                TableCommand::SetInitiative {
                    figure,
                    initiative,
                    reply,
                } => {
                    let result = self
                        .session
                        .set_initiative(figure, initiative)
                        .map_err(TableError::from);
                    let _ = reply.send(result);
                }
                TableCommand::SetScenario { scenario, reply } => {
                    let result = self.session.set_scenario(scenario).map_err(TableError::from);
                    let _ = reply.send(result);
                }
                TableCommand::AddSection { section, reply } => {
                    let result = self.session.add_section(section).map_err(TableError::from);
                    let _ = reply.send(result);
                }
                TableCommand::ResetRound { reply } => {
                    self.session.reset_round();
                    let _ = reply.send(());
                }
                TableCommand::AddCharacter {
                    name,
                    edition,
                    level,
                    reply,
                } => {
                    let _ = reply.send(self.session.add_character(&name, &edition, level));
                }
                TableCommand::AddMonster { data, reply } => {
                    let _ = reply.send(self.session.add_monster(&data));
                }
                TableCommand::AddObjective { data, reply } => {
                    let _ = reply.send(self.session.add_objective(&data));
                }
                TableCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                    continue;
                }
                TableCommand::Subscribe { sender } => {
                    let _ = sender.send(self.snapshot());
                    self.subscribers.push(sender);
                    continue;
                }
                TableCommand::ReleaseBusy => {
                    self.session.release_busy();
                }
                TableCommand::Shutdown => {
                    tracing::info!(table_id = %self.table_id, "table shutting down");
                    break;
                }
            }
            self.publish();
        }

        tracing::info!(table_id = %self.table_id, "table actor stopped");
    }

    fn handle_advance_phase(&mut self) -> Result<PhaseTransition, TableError> {
        if self.session.is_busy() {
            tracing::warn!(table_id = %self.table_id, "phase trigger while busy, ignoring");
            return Err(TableError::Busy(self.table_id));
        }

        let mut rosters: Vec<&mut dyn RosterCollaborator> = self
            .collaborators
            .rosters
            .iter_mut()
            .map(|r| &mut **r as &mut dyn RosterCollaborator)
            .collect();
        let transition = self.session.advance_phase(&mut rosters);
        self.schedule_release();

        tracing::info!(
            table_id = %self.table_id,
            ?transition,
            round = self.session.round(),
            "phase trigger handled"
        );
        Ok(transition)
    }

    fn handle_toggle_figure(&mut self, figure: FigureId) -> Result<(), TableError> {
        if self.session.is_busy() {
            tracing::warn!(table_id = %self.table_id, %figure, "turn trigger while busy, ignoring");
            return Err(TableError::Busy(self.table_id));
        }
        self.session
            .toggle_figure(figure, &mut *self.collaborators.conditions)?;
        Ok(())
    }

    /// Queues `ReleaseBusy` behind the commands already waiting.
    fn schedule_release(&self) {
        let Some(sender) = self.commands.upgrade() else {
            return;
        };
        if let Err(mpsc::error::TrySendError::Full(cmd)) =
            sender.try_send(TableCommand::ReleaseBusy)
        {
            tokio::spawn(async move {
                let _ = sender.send(cmd).await;
            });
        }
    }

    /// Sends the current state to every observer, dropping the ones
    /// that have gone away.
    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|sender| sender.send(snapshot.clone()).is_ok());
    }

    fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            table_id: self.table_id,
            phase: self.session.phase(),
            round: self.session.round(),
            level: self.session.level(),
            scenario_level: self.session.scenario_level(),
            roster: self.session.roster().to_vec(),
            active: self.session.active_figure().map(Figure::id),
            elements: self.session.elements().clone(),
            busy: self.session.is_busy(),
            ready_to_advance: self.session.ready_to_advance(),
            total_elapsed: self.session.total_elapsed(),
            session_elapsed: self.session.session_elapsed(),
        }
    }
}

/// Spawns a new table actor task and returns a handle to communicate
/// with it.
pub(crate) fn spawn_table(
    table_id: TableId,
    session: Session,
    collaborators: Collaborators,
    channel_size: usize,
) -> TableHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = TableActor {
        table_id,
        session,
        collaborators,
        subscribers: Vec::new(),
        receiver: rx,
        commands: tx.downgrade(),
    };

    tokio::spawn(actor.run());

    TableHandle {
        table_id,
        sender: tx,
    }
}
