//! The session controller: owns the world and advances it one tick at a time.

use super::snapshot::{AgentView, PipeView, SessionSnapshot};
use super::types::{DeathCause, OverReason, SessionState, TickEvent, TickResult};
use crate::audio::{AudioEvent, AudioPort, NullAudio};
use crate::bird::{AgentStatus, Bird};
use crate::core::{ConfigError, CrashBehavior, GameConfig};
use crate::decision::{DecisionSource, Observation};
use crate::export::{ExportPort, NoExport};
use crate::floor::Floor;
use crate::pipe::{GapGeometry, Pipe};
use crate::sprites::SpriteSet;
use crate::stop::StopSignal;
use rand::Rng;

/// One play-through: a population of birds (one for a human game) flying
/// through a shared stream of pipes.
pub struct Session {
    config: GameConfig,
    sprites: SpriteSet,
    agents: Vec<Bird>,
    pipes: Vec<Pipe>,
    floor: Floor,
    score: u32,
    frame: u64,
    state: SessionState,
    over_reason: Option<OverReason>,
    generation: Option<u32>,
    /// Gap fed to decision functions when the lookahead pipe is missing.
    last_gap: Option<GapGeometry>,
    audio: Box<dyn AudioPort>,
    export: Box<dyn ExportPort>,
    stop: Option<StopSignal>,
}

impl Session {
    /// New session with `population` birds at the spawn point and one pipe at
    /// the configured first-pipe x.
    pub fn new<R: Rng>(
        config: GameConfig,
        sprites: SpriteSet,
        population: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let agents = (0..population).map(|_| Bird::spawn(&config.bird)).collect();
        let first = Pipe::first(&config, &sprites, rng);
        let last_gap = Some(first.gap());
        let floor = Floor::new(config.world.floor_y, sprites.floor_width());

        tracing::debug!(
            "Session created: {} agent(s), first pipe gap at {}",
            population,
            first.gap_center
        );

        Ok(Self {
            config,
            sprites,
            agents,
            pipes: vec![first],
            floor,
            score: 0,
            frame: 0,
            state: SessionState::Running,
            over_reason: None,
            generation: None,
            last_gap,
            audio: Box::new(NullAudio),
            export: Box::new(NoExport),
            stop: None,
        })
    }

    /// Single human-controlled bird.
    pub fn solo<R: Rng>(config: GameConfig, sprites: SpriteSet, rng: &mut R) -> Result<Self, ConfigError> {
        Self::new(config, sprites, 1, rng)
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioPort>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_export(mut self, export: Box<dyn ExportPort>) -> Self {
        self.export = export;
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Generation number shown by renderers of a training run.
    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = Some(generation);
        self
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    pub fn agents(&self) -> &[Bird] {
        &self.agents
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn over_reason(&self) -> Option<OverReason> {
        self.over_reason
    }

    pub fn generation(&self) -> Option<u32> {
        self.generation
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::SessionOver
    }

    pub fn live_count(&self) -> usize {
        self.agents.iter().filter(|b| b.is_alive()).count()
    }

    /// First live agent in population order.
    pub fn leader(&self) -> Option<usize> {
        self.agents.iter().position(Bird::is_alive)
    }

    /// Index of the pipe live agents should steer by: the second pipe once
    /// the leader is fully past the first one, otherwise the first.
    pub fn lookahead_index(&self) -> usize {
        let pipe_width = self.sprites.pipe_width() as f64;
        match (self.leader(), self.pipes.first()) {
            (Some(leader), Some(first))
                if self.pipes.len() > 1 && self.agents[leader].x > first.x + pipe_width =>
            {
                1
            }
            _ => 0,
        }
    }

    /// Gap decision functions currently see.
    pub fn lookahead_gap(&self) -> Option<GapGeometry> {
        self.pipes
            .get(self.lookahead_index())
            .map(Pipe::gap)
            .or(self.last_gap)
    }

    /// End the session now. No-op if it is already over.
    pub fn stop(&mut self) -> TickResult {
        let mut result = TickResult {
            frame: self.frame,
            ..TickResult::default()
        };
        if !self.is_over() {
            self.finish(OverReason::Stopped, &mut result);
        }
        result
    }

    // ── Tick ───────────────────────────────────────────────────────────

    /// Advance the session by one tick.
    ///
    /// A pending stop request ends the session before anything moves. Once
    /// the session is over every call is a no-op returning an empty result.
    pub fn tick<R: Rng>(&mut self, source: &mut dyn DecisionSource, rng: &mut R) -> TickResult {
        let mut result = TickResult {
            frame: self.frame,
            ..TickResult::default()
        };
        if self.is_over() {
            return result;
        }
        if self.stop.as_ref().is_some_and(StopSignal::is_requested) {
            self.finish(OverReason::Stopped, &mut result);
            return result;
        }

        self.frame += 1;
        result.frame = self.frame;

        match self.state {
            SessionState::Running => self.tick_running(source, rng, &mut result),
            SessionState::AgentDead => self.tick_falling(&mut result),
            SessionState::SessionOver => {}
        }
        result
    }

    /// Tick until the session is over or `max_ticks` have run, handing every
    /// result to `on_tick`. Returns the number of ticks run.
    pub fn run<R, F>(
        &mut self,
        source: &mut dyn DecisionSource,
        rng: &mut R,
        max_ticks: Option<u64>,
        mut on_tick: F,
    ) -> u64
    where
        R: Rng,
        F: FnMut(&TickResult),
    {
        let mut ticks = 0;
        while !self.is_over() {
            if max_ticks.is_some_and(|max| ticks >= max) {
                let mut result = TickResult {
                    frame: self.frame,
                    ..TickResult::default()
                };
                self.finish(OverReason::TickLimit, &mut result);
                on_tick(&result);
                break;
            }
            let result = self.tick(source, rng);
            ticks += 1;
            on_tick(&result);
        }
        ticks
    }

    fn tick_running<R: Rng>(
        &mut self,
        source: &mut dyn DecisionSource,
        rng: &mut R,
        result: &mut TickResult,
    ) {
        // 1. Decisions and agent motion
        let gap = self.lookahead_gap();
        self.last_gap = gap;
        source.begin_tick();

        for (agent, bird) in self.agents.iter_mut().enumerate() {
            match bird.status {
                AgentStatus::Dead => continue,
                AgentStatus::Crashed => {}
                AgentStatus::Alive => {
                    let observation = Observation {
                        agent,
                        y: bird.y,
                        gap,
                    };
                    match source.decide(&observation) {
                        Ok(true) => {
                            bird.jump(&self.config.bird);
                            self.audio.play(AudioEvent::Flap);
                            result.events.push(TickEvent::Flapped { agent });
                        }
                        Ok(false) => {}
                        Err(error) => {
                            tracing::warn!("Decision failed for agent {}: {}", agent, error);
                            result.events.push(TickEvent::DecisionFailed { agent, error });
                        }
                    }
                    result.stepped.push(agent);
                }
            }

            let step = bird.advance_tick(&self.config.bird);
            if step.dive_step {
                self.audio.play(AudioEvent::DiveStep);
            }
            bird.animate(&self.config.bird);
        }

        // 2. Floor
        self.floor.advance_tick(&self.config.floor);

        // 3. Pipes: scroll, collide, mark for removal
        let mut retired = Vec::new();
        for (index, pipe) in self.pipes.iter_mut().enumerate() {
            pipe.advance_tick(&self.config.pipe);

            for (agent, bird) in self.agents.iter_mut().enumerate() {
                if !bird.is_alive() {
                    continue;
                }
                let mask = self.sprites.bird_mask(bird.frame);
                if !pipe.overlaps(mask, bird.x, bird.y, &self.sprites) {
                    continue;
                }

                self.audio.play(AudioEvent::Hit);
                match self.config.rules.crash {
                    CrashBehavior::FallToGround => {
                        bird.status = AgentStatus::Crashed;
                        tracing::debug!("Agent {} crashed into pipe at x={}", agent, pipe.x);
                        result.events.push(TickEvent::Crashed { agent });
                    }
                    CrashBehavior::Remove => {
                        bird.status = AgentStatus::Dead;
                        tracing::debug!("Agent {} removed by pipe at x={}", agent, pipe.x);
                        result.events.push(TickEvent::Died {
                            agent,
                            cause: DeathCause::Collision,
                        });
                    }
                }
            }

            if pipe.is_off_screen(&self.sprites) {
                retired.push(index);
            }
        }

        // 4. Drop off-screen pipes only after the scan
        if !retired.is_empty() {
            let mut index = 0;
            self.pipes.retain(|_| {
                let keep = !retired.contains(&index);
                index += 1;
                keep
            });
            result
                .events
                .extend(retired.iter().map(|_| TickEvent::PipeRetired));
        }

        // 5. Scoring: one check per tick, against the first unpassed pipe
        self.update_score(rng, result);

        // 6. Out of bounds
        self.check_bounds(result);

        // 7. End conditions
        if let Some(ceiling) = self.config.rules.score_ceiling {
            if self.score >= ceiling {
                let exported = self.export_leader(source);
                tracing::info!("Score ceiling {} reached", ceiling);
                result.events.push(TickEvent::ScoreCeilingReached {
                    score: self.score,
                    exported,
                });
                self.finish(OverReason::ScoreCeiling, result);
                return;
            }
        }
        self.settle(result);
    }

    /// No live agent left: the world is frozen and crashed birds keep falling
    /// until they hit the ground.
    fn tick_falling(&mut self, result: &mut TickResult) {
        for bird in self.agents.iter_mut() {
            if bird.status != AgentStatus::Crashed {
                continue;
            }
            let step = bird.advance_tick(&self.config.bird);
            if step.dive_step {
                self.audio.play(AudioEvent::DiveStep);
            }
            bird.animate(&self.config.bird);
        }
        self.check_bounds(result);
        self.settle(result);
    }

    fn update_score<R: Rng>(&mut self, rng: &mut R, result: &mut TickResult) {
        let Some(leader_x) = self.leader().map(|i| self.agents[i].x) else {
            return;
        };
        let Some(pipe) = self.pipes.iter_mut().find(|p| !p.passed) else {
            return;
        };
        if !pipe.has_been_passed(leader_x) {
            return;
        }

        self.score += 1;
        let credited = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_alive())
            .map(|(i, _)| i)
            .collect();
        self.audio.play(AudioEvent::Score);
        result.events.push(TickEvent::Scored {
            score: self.score,
            credited,
        });

        let spawned = Pipe::create(
            self.config.pipe_spawn_x(),
            &self.config.pipe,
            &self.sprites,
            rng,
        );
        tracing::debug!(
            "Score {}; pipe spawned at x={} gap={}",
            self.score,
            spawned.x,
            spawned.gap_center
        );
        result.events.push(TickEvent::PipeSpawned {
            x: spawned.x,
            gap_center: spawned.gap_center,
        });
        self.pipes.push(spawned);
    }

    /// Kill agents outside the playable band. Crashed birds are always
    /// stopped by the floor, whatever the rules say.
    fn check_bounds(&mut self, result: &mut TickResult) {
        let rules = &self.config.rules;
        let bird_height = self.sprites.bird_height() as f64;
        let floor_y = self.config.world.floor_y;

        for (agent, bird) in self.agents.iter_mut().enumerate() {
            if !bird.is_active() {
                continue;
            }
            let check_floor = rules.check_floor || bird.status == AgentStatus::Crashed;
            let cause = if check_floor && bird.y + bird_height - rules.floor_margin >= floor_y {
                Some(DeathCause::Floor)
            } else if rules.check_ceiling && bird.y < rules.ceiling_y {
                Some(DeathCause::Ceiling)
            } else {
                None
            };

            if let Some(cause) = cause {
                bird.status = AgentStatus::Dead;
                self.audio.play(AudioEvent::Die);
                tracing::debug!("Agent {} died ({:?}) at y={:.1}", agent, cause, bird.y);
                result.events.push(TickEvent::Died { agent, cause });
            }
        }
    }

    /// Move to `AgentDead` or `SessionOver` once nobody is alive.
    fn settle(&mut self, result: &mut TickResult) {
        if self.agents.iter().any(Bird::is_alive) {
            return;
        }
        if self.agents.iter().any(Bird::is_active) {
            if self.state != SessionState::AgentDead {
                tracing::debug!("All agents down; waiting for crashed birds to land");
                self.state = SessionState::AgentDead;
            }
            return;
        }
        self.finish(OverReason::AllAgentsDead, result);
    }

    fn export_leader(&mut self, source: &dyn DecisionSource) -> Option<usize> {
        let leader = self.leader()?;
        let function = source.decision_function(leader)?;
        self.export.export_best(leader, self.score, function);
        Some(leader)
    }

    fn finish(&mut self, reason: OverReason, result: &mut TickResult) {
        self.state = SessionState::SessionOver;
        self.over_reason = Some(reason);
        tracing::info!(
            "Session over after {} ticks: {:?}, score {}",
            self.frame,
            reason,
            self.score
        );
        result.events.push(TickEvent::SessionOver { reason });
    }

    // ── Snapshot ───────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            frame: self.frame,
            score: self.score,
            state: self.state,
            over_reason: self.over_reason,
            generation: self.generation,
            live_count: self.live_count(),
            agents: self
                .agents
                .iter()
                .enumerate()
                .map(|(id, b)| AgentView {
                    id,
                    x: b.x,
                    y: b.y,
                    tilt: b.tilt,
                    frame: b.frame,
                    status: b.status,
                })
                .collect(),
            pipes: self
                .pipes
                .iter()
                .map(|p| PipeView {
                    x: p.x,
                    gap_center: p.gap_center,
                    top: p.top,
                    bottom: p.bottom,
                    passed: p.passed,
                })
                .collect(),
            floor: self.floor.clone(),
            lookahead: self.lookahead_gap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DecisionError;
    use crate::decision::{FnDecision, KeyboardDecision, TrainedDecision};
    use crate::export::MemoryExport;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// Never jumps.
    struct Idle;

    impl DecisionSource for Idle {
        fn decide(&mut self, _observation: &Observation) -> Result<bool, DecisionError> {
            Ok(false)
        }
    }

    /// Fails for one agent, idles for the rest.
    struct FailsFor(usize);

    impl DecisionSource for FailsFor {
        fn decide(&mut self, observation: &Observation) -> Result<bool, DecisionError> {
            if observation.agent == self.0 {
                Err(DecisionError::NonFinite(f64::NAN))
            } else {
                Ok(false)
            }
        }
    }

    /// Idles and remembers the last gap it was shown.
    #[derive(Default)]
    struct GapSeen(Option<GapGeometry>);

    impl DecisionSource for GapSeen {
        fn decide(&mut self, observation: &Observation) -> Result<bool, DecisionError> {
            self.0 = observation.gap;
            Ok(false)
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<AudioEvent>>>);

    impl AudioPort for Recorder {
        fn play(&mut self, event: AudioEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    fn population(size: usize) -> Session {
        Session::new(GameConfig::population(), SpriteSet::default(), size, &mut test_rng()).unwrap()
    }

    /// Clear the way: one pipe far to the right with a huge gap.
    fn open_pipes(session: &mut Session) {
        session.pipes = vec![Pipe::with_gap_center(700.0, 0.0, 700.0, 640)];
    }

    #[test]
    fn test_new_rejects_empty_population() {
        let result = Session::new(GameConfig::default(), SpriteSet::default(), 0, &mut test_rng());
        assert!(matches!(result, Err(ConfigError::EmptyPopulation)));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.pipe.gap_center_min = 500;
        let result = Session::new(config, SpriteSet::default(), 1, &mut test_rng());
        assert!(matches!(result, Err(ConfigError::InvalidGapRange { .. })));
    }

    #[test]
    fn test_initial_state() {
        let session = population(3);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.agents().len(), 3);
        assert_eq!(session.pipes().len(), 1);
        assert!((session.pipes()[0].x - 700.0).abs() < f64::EPSILON);
        assert_eq!(session.score(), 0);
        assert_eq!(session.frame(), 0);
        assert_eq!(session.live_count(), 3);
        assert!(session.lookahead_gap().is_some());
    }

    #[test]
    fn test_idle_population_dies_on_tick_22() {
        let mut session = population(2);
        let mut rng = test_rng();
        let mut last = TickResult::default();
        for _ in 0..22 {
            last = session.tick(&mut Idle, &mut rng);
        }
        assert_eq!(last.frame, 22);
        let deaths: Vec<_> = last.deaths().collect();
        assert_eq!(deaths, vec![(0, DeathCause::Floor), (1, DeathCause::Floor)]);
        assert_eq!(last.session_over(), Some(OverReason::AllAgentsDead));
        assert!(session.is_over());
    }

    #[test]
    fn test_no_death_before_tick_22() {
        let mut session = population(1);
        let mut rng = test_rng();
        for _ in 0..21 {
            let result = session.tick(&mut Idle, &mut rng);
            assert_eq!(result.deaths().count(), 0);
        }
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_over_session_ignores_ticks() {
        let mut session = population(1);
        let mut rng = test_rng();
        session.stop();
        let result = session.tick(&mut Idle, &mut rng);
        assert!(result.events.is_empty());
        assert_eq!(session.frame(), 0);
    }

    #[test]
    fn test_stop_signal_honored_at_tick_boundary() {
        let signal = StopSignal::new();
        let mut session = population(1).with_stop_signal(signal.clone());
        let mut rng = test_rng();
        session.tick(&mut Idle, &mut rng);
        signal.request();
        let result = session.tick(&mut Idle, &mut rng);
        assert_eq!(result.session_over(), Some(OverReason::Stopped));
        assert_eq!(session.frame(), 1);
        assert!(result.stepped.is_empty());
    }

    #[test]
    fn test_decision_error_means_no_jump() {
        let mut session = population(2);
        let mut rng = test_rng();
        let result = session.tick(&mut FailsFor(1), &mut rng);
        assert!(result.events.iter().any(|e| matches!(
            e,
            TickEvent::DecisionFailed { agent: 1, .. }
        )));
        assert_eq!(result.stepped, vec![0, 1]);
        // Both fell by the same amount
        assert!((session.agents()[0].y - session.agents()[1].y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_audio_events_on_flap() {
        let recorder = Recorder::default();
        let mut session = population(1).with_audio(Box::new(recorder.clone()));
        let mut rng = test_rng();
        let mut keys = KeyboardDecision::new();
        keys.tap();
        session.tick(&mut keys, &mut rng);
        assert_eq!(recorder.0.borrow().first(), Some(&AudioEvent::Flap));
    }

    fn count(recorder: &Recorder, event: AudioEvent) -> usize {
        recorder.0.borrow().iter().filter(|e| **e == event).count()
    }

    #[test]
    fn test_audio_hit_on_pipe_collision() {
        let recorder = Recorder::default();
        let mut session = population(1).with_audio(Box::new(recorder.clone()));
        let mut rng = test_rng();
        session.pipes = vec![Pipe::with_gap_center(205.0, 0.0, 360.0, 640)];
        session.tick(&mut Idle, &mut rng);
        assert_eq!(count(&recorder, AudioEvent::Hit), 1);
        assert_eq!(count(&recorder, AudioEvent::Die), 0);
    }

    #[test]
    fn test_audio_die_and_dive_steps_in_free_fall() {
        let recorder = Recorder::default();
        let mut session = population(1).with_audio(Box::new(recorder.clone()));
        let mut rng = test_rng();
        open_pipes(&mut session);
        for _ in 0..22 {
            session.tick(&mut Idle, &mut rng);
        }
        assert!(session.is_over());
        assert_eq!(count(&recorder, AudioEvent::Die), 1);
        assert_eq!(count(&recorder, AudioEvent::Hit), 0);
        // 25 -> 5 -> -15 -> -35 -> -55 -> -75 -> -90
        assert_eq!(count(&recorder, AudioEvent::DiveStep), 6);
        assert!((session.agents()[0].tilt - session.config().bird.min_tilt).abs() < f64::EPSILON);
    }

    #[test]
    fn test_audio_score_once_per_pipe() {
        let recorder = Recorder::default();
        let mut session = population(2).with_audio(Box::new(recorder.clone()));
        let mut rng = test_rng();
        // Open pipe about to slip behind the birds at x = 230
        session.pipes = vec![Pipe::with_gap_center(228.0, 0.0, 700.0, 640)];
        for _ in 0..10 {
            session.tick(&mut Idle, &mut rng);
        }
        assert_eq!(session.score(), 1);
        assert_eq!(count(&recorder, AudioEvent::Score), 1);
    }

    #[test]
    fn test_missing_lookahead_pipe_holds_last_gap() {
        let mut session = population(1);
        let mut rng = test_rng();
        let mut seen = GapSeen::default();
        session.tick(&mut seen, &mut rng);
        let gap = session.lookahead_gap().unwrap();

        session.pipes.clear();
        for _ in 0..3 {
            let result = session.tick(&mut seen, &mut rng);
            assert_eq!(result.stepped, vec![0]);
            assert_eq!(seen.0, Some(gap));
            assert_eq!(session.lookahead_gap(), Some(gap));
        }
    }

    #[test]
    fn test_trained_function_still_steers_without_pipes() {
        let mut session = population(1);
        let mut rng = test_rng();
        let always = |_: &[f64]| 1.0;
        let mut source = TrainedDecision::new(vec![FnDecision(always)]);
        session.tick(&mut source, &mut rng);

        session.pipes.clear();
        let result = session.tick(&mut source, &mut rng);
        assert!(result.events.contains(&TickEvent::Flapped { agent: 0 }));
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_pipe_collision_removes_agent() {
        let mut session = population(1);
        let mut rng = test_rng();
        // Bottom pipe right under the bird
        session.pipes = vec![Pipe::with_gap_center(205.0, 0.0, 360.0, 640)];
        let result = session.tick(&mut Idle, &mut rng);
        assert!(result.events.contains(&TickEvent::Died {
            agent: 0,
            cause: DeathCause::Collision,
        }));
        assert_eq!(result.session_over(), Some(OverReason::AllAgentsDead));
    }

    #[test]
    fn test_solo_crash_falls_to_ground_with_world_frozen() {
        let mut session = Session::solo(GameConfig::solo(), SpriteSet::default(), &mut test_rng()).unwrap();
        let mut rng = test_rng();
        // Bottom pipe just below the bird's spawn (y = 50)
        session.pipes = vec![Pipe::with_gap_center(205.0, 0.0, 60.0, 640)];

        let result = session.tick(&mut Idle, &mut rng);
        assert!(result.events.contains(&TickEvent::Crashed { agent: 0 }));
        assert_eq!(session.state(), SessionState::AgentDead);

        let pipe_x = session.pipes()[0].x;
        let floor_x = session.floor().x1;
        let mut ticks = 0;
        while !session.is_over() {
            let y = session.agents()[0].y;
            session.tick(&mut Idle, &mut rng);
            assert!(session.agents()[0].y >= y || session.is_over());
            ticks += 1;
            assert!(ticks < 200, "crashed bird never landed");
        }
        assert_eq!(session.over_reason(), Some(OverReason::AllAgentsDead));
        assert!((session.pipes()[0].x - pipe_x).abs() < f64::EPSILON);
        assert!((session.floor().x1 - floor_x).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ceiling_kills() {
        let mut session = population(1);
        let mut rng = test_rng();
        open_pipes(&mut session);
        session.agents[0].y = -45.0;
        session.agents[0].height = -45.0;
        let mut keys = KeyboardDecision::new();
        keys.tap();
        let result = session.tick(&mut keys, &mut rng);
        assert!(result.events.contains(&TickEvent::Died {
            agent: 0,
            cause: DeathCause::Ceiling,
        }));
    }

    #[test]
    fn test_ceiling_check_can_be_disabled() {
        let mut config = GameConfig::population();
        config.rules.check_ceiling = false;
        let mut session = Session::new(config, SpriteSet::default(), 1, &mut test_rng()).unwrap();
        let mut rng = test_rng();
        open_pipes(&mut session);
        session.agents[0].y = -100.0;
        let result = session.tick(&mut Idle, &mut rng);
        assert_eq!(result.deaths().count(), 0);
    }

    #[test]
    fn test_score_ceiling_exports_leader() {
        let export = MemoryExport::default();
        let mut config = GameConfig::population();
        config.rules.score_ceiling = Some(1);
        let mut session = Session::new(config, SpriteSet::default(), 2, &mut test_rng())
            .unwrap()
            .with_export(Box::new(export));
        let mut rng = test_rng();
        // Pipe already behind the birds and in no one's way
        session.pipes = vec![Pipe::with_gap_center(228.0, 0.0, 700.0, 640)];
        session.agents[0].status = AgentStatus::Dead;

        let never = |_: &[f64]| 0.0;
        let mut source = TrainedDecision::new(vec![FnDecision(never), FnDecision(never)]);
        let result = session.tick(&mut source, &mut rng);

        assert!(result.events.contains(&TickEvent::ScoreCeilingReached {
            score: 1,
            exported: Some(1),
        }));
        assert_eq!(result.session_over(), Some(OverReason::ScoreCeiling));
    }

    #[test]
    fn test_run_respects_tick_limit() {
        let mut session = population(1);
        let mut rng = test_rng();
        let mut keys = KeyboardDecision::new();
        let ticks = session.run(&mut keys, &mut rng, Some(5), |_| {});
        assert_eq!(ticks, 5);
        assert_eq!(session.over_reason(), Some(OverReason::TickLimit));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = population(2).with_generation(7);
        let mut rng = test_rng();
        session.tick(&mut Idle, &mut rng);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.frame, 1);
        assert_eq!(snapshot.generation, Some(7));
        assert_eq!(snapshot.agents.len(), 2);
        assert_eq!(snapshot.pipes.len(), 1);
        assert_eq!(snapshot.live_count, 2);
        assert_eq!(snapshot.visible_agents().count(), 2);
        assert!(serde_json::to_string(&snapshot).is_ok());
    }
}
