#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns overlapping hitboxes into world commands.
//!
//! Checks run in a fixed order against one snapshot of the frame:
//!
//! 1. hero shots against enemies,
//! 2. hero shots against enemy shots,
//! 3. the hero against enemy bodies and enemy shots,
//! 4. capturing enemies against rescuables,
//! 5. the hero against rescuables.
//!
//! Every entity is resolved at most once per frame. Removals happen when the
//! world applies the emitted commands, never during the pass itself.

use std::collections::HashSet;

use robotron_core::{
    ActorId, ActorSnapshot, Command, Faction, HeroSnapshot, HitCause, ProjectileId,
    ProjectileSnapshot,
};

/// Snapshot of every collidable entity for one frame.
#[derive(Clone, Copy, Debug)]
pub struct CollisionView<'a> {
    /// The hero, absent while no wave is running.
    pub hero: Option<HeroSnapshot>,
    /// Every actor except the hero.
    pub actors: &'a [ActorSnapshot],
    /// Shots fired by the hero.
    pub hero_projectiles: &'a [ProjectileSnapshot],
    /// Shots fired by enemies.
    pub enemy_projectiles: &'a [ProjectileSnapshot],
}

/// Collision resolver that reuses its bookkeeping between frames.
#[derive(Debug, Default)]
pub struct Collisions {
    struck: HashSet<ActorId>,
    consumed: HashSet<ProjectileId>,
    removed: HashSet<ActorId>,
}

impl Collisions {
    /// Creates a resolver with empty bookkeeping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the commands resolving every overlap in `view`.
    pub fn handle(&mut self, view: CollisionView<'_>, out: &mut Vec<Command>) {
        self.struck.clear();
        self.consumed.clear();
        self.removed.clear();

        self.resolve_shots_against_enemies(&view, out);
        self.resolve_intercepts(&view, out);
        self.resolve_hero_hit(&view, out);
        self.resolve_captures(&view, out);
        self.resolve_saves(&view, out);
    }

    fn resolve_shots_against_enemies(&mut self, view: &CollisionView<'_>, out: &mut Vec<Command>) {
        for shot in view.hero_projectiles {
            let mut overlapped = false;
            let mut target = None;
            for enemy in enemies(view.actors) {
                if !shot.rect.intersects(&enemy.rect) {
                    continue;
                }
                overlapped = true;
                if !self.struck.contains(&enemy.id) {
                    target = Some(enemy);
                    break;
                }
            }

            match target {
                Some(enemy) => {
                    if !enemy.species.is_invulnerable() {
                        let _ = self.struck.insert(enemy.id);
                    }
                    let _ = self.consumed.insert(shot.id);
                    out.push(Command::StrikeEnemy {
                        projectile: shot.id,
                        enemy: enemy.id,
                    });
                }
                None if overlapped => {
                    let _ = self.consumed.insert(shot.id);
                    out.push(Command::DiscardProjectile {
                        projectile: shot.id,
                    });
                }
                None => {}
            }
        }
    }

    fn resolve_intercepts(&mut self, view: &CollisionView<'_>, out: &mut Vec<Command>) {
        for shot in view.hero_projectiles {
            if self.consumed.contains(&shot.id) {
                continue;
            }
            let hit = view.enemy_projectiles.iter().find(|enemy_shot| {
                !self.consumed.contains(&enemy_shot.id) && shot.rect.intersects(&enemy_shot.rect)
            });
            if let Some(enemy_shot) = hit {
                let _ = self.consumed.insert(shot.id);
                let _ = self.consumed.insert(enemy_shot.id);
                out.push(Command::InterceptProjectile {
                    hero_projectile: shot.id,
                    enemy_projectile: enemy_shot.id,
                });
            }
        }
    }

    fn resolve_hero_hit(&mut self, view: &CollisionView<'_>, out: &mut Vec<Command>) {
        let Some(hero) = view.hero else {
            return;
        };
        if hero.invulnerable {
            return;
        }

        let body = enemies(view.actors)
            .filter(|enemy| !self.struck.contains(&enemy.id))
            .find(|enemy| hero.rect.intersects(&enemy.rect))
            .map(|enemy| HitCause::Body(enemy.id));
        let cause = body.or_else(|| {
            view.enemy_projectiles
                .iter()
                .find(|shot| !self.consumed.contains(&shot.id) && hero.rect.intersects(&shot.rect))
                .map(|shot| HitCause::Projectile(shot.id))
        });

        if let Some(cause) = cause {
            if let HitCause::Projectile(id) = cause {
                let _ = self.consumed.insert(id);
            }
            out.push(Command::HitHero { cause });
        }
    }

    fn resolve_captures(&mut self, view: &CollisionView<'_>, out: &mut Vec<Command>) {
        for rescuable in rescuables(view.actors) {
            let captor = view.actors.iter().find(|actor| {
                actor.species.captures_rescuables() && actor.rect.intersects(&rescuable.rect)
            });
            if let Some(captor) = captor {
                let _ = self.removed.insert(rescuable.id);
                out.push(Command::CaptureRescuable {
                    rescuable: rescuable.id,
                    captor: captor.id,
                });
            }
        }
    }

    fn resolve_saves(&mut self, view: &CollisionView<'_>, out: &mut Vec<Command>) {
        let Some(hero) = view.hero else {
            return;
        };
        for rescuable in rescuables(view.actors) {
            if self.removed.contains(&rescuable.id) || !hero.rect.intersects(&rescuable.rect) {
                continue;
            }
            let _ = self.removed.insert(rescuable.id);
            out.push(Command::SaveRescuable {
                rescuable: rescuable.id,
            });
        }
    }
}

fn enemies(actors: &[ActorSnapshot]) -> impl Iterator<Item = &ActorSnapshot> {
    actors
        .iter()
        .filter(|actor| actor.species.faction() == Faction::Enemy)
}

fn rescuables(actors: &[ActorSnapshot]) -> impl Iterator<Item = &ActorSnapshot> {
    actors
        .iter()
        .filter(|actor| actor.species.faction() == Faction::Rescuable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use robotron_core::{ProjectileKind, Rect, Species};

    #[test]
    fn invulnerable_hero_ignores_contact() {
        let mut collisions = Collisions::new();
        let actors = [ActorSnapshot {
            id: ActorId::new(2),
            species: Species::Grunt,
            rect: Rect::new(0, 0, 10, 10),
        }];
        let mut out = Vec::new();

        collisions.handle(
            CollisionView {
                hero: Some(HeroSnapshot {
                    id: ActorId::new(1),
                    rect: Rect::new(5, 5, 10, 10),
                    invulnerable: true,
                }),
                actors: &actors,
                hero_projectiles: &[],
                enemy_projectiles: &[],
            },
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn enemy_killed_this_frame_cannot_touch_the_hero() {
        let mut collisions = Collisions::new();
        let actors = [ActorSnapshot {
            id: ActorId::new(10),
            species: Species::Grunt,
            rect: Rect::new(110, 100, 29, 27),
        }];
        let hero_shots = [ProjectileSnapshot {
            id: ProjectileId::new(1),
            kind: ProjectileKind::HeroShot,
            rect: Rect::new(125, 110, 6, 1),
        }];
        let mut out = Vec::new();

        collisions.handle(
            CollisionView {
                hero: Some(HeroSnapshot {
                    id: ActorId::new(1),
                    rect: Rect::new(100, 100, 20, 27),
                    invulnerable: false,
                }),
                actors: &actors,
                hero_projectiles: &hero_shots,
                enemy_projectiles: &[],
            },
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::StrikeEnemy {
                projectile: ProjectileId::new(1),
                enemy: ActorId::new(10),
            }]
        );
    }
}
