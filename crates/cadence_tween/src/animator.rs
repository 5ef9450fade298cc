//! Animator capability and the registry that resolves it per target type
//!
//! The engine never knows what it animates. A target is an externally owned
//! `Rc<RefCell<T>>` wrapped in a [`TargetRef`]; reading and writing its numeric
//! attributes goes through an [`Animator`] resolved from an [`AnimatorRegistry`]:
//!
//! 1. an animator registered for the exact target class,
//! 2. the target itself, when it was wrapped with [`TargetRef::self_animated`],
//! 3. an animator registered for a declared ancestor class, walking upward.

use rustc_hash::FxHashMap;
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::{Result, TweenError};

/// Reads and writes the numeric attributes of a target.
///
/// `tween_type` is an opaque selector chosen by the caller so one target can expose
/// several independently tweenable attribute groups.
pub trait Animator {
    /// Write the current values of the attribute group into `values` and return how
    /// many were written. Must not modify the target.
    fn retrieve(&self, target: &dyn Any, tween_type: i32, values: &mut [f32]) -> usize;

    /// Apply `values` to the attribute group.
    fn animate(&self, target: &mut dyn Any, tween_type: i32, values: &[f32]);
}

/// Typed accessor for a concrete target type.
///
/// Register it with [`AnimatorRegistry::register`]; the registry wraps it into an
/// [`Animator`] that downcasts the target.
pub trait Accessor<T: 'static> {
    fn retrieve(&self, target: &T, tween_type: i32, values: &mut [f32]) -> usize;
    fn animate(&self, target: &mut T, tween_type: i32, values: &[f32]);
}

/// Targets that implement the animator capability themselves.
pub trait SelfAnimated: 'static {
    fn retrieve_values(&self, tween_type: i32, values: &mut [f32]) -> usize;
    fn animate_values(&mut self, tween_type: i32, values: &[f32]);
}

struct Typed<T, A> {
    accessor: A,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: 'static, A: Accessor<T>> Animator for Typed<T, A> {
    fn retrieve(&self, target: &dyn Any, tween_type: i32, values: &mut [f32]) -> usize {
        match target.downcast_ref::<T>() {
            Some(target) => self.accessor.retrieve(target, tween_type, values),
            None => {
                tracing::warn!("Accessor for {} used on a foreign target", type_name::<T>());
                0
            }
        }
    }

    fn animate(&self, target: &mut dyn Any, tween_type: i32, values: &[f32]) {
        match target.downcast_mut::<T>() {
            Some(target) => self.accessor.animate(target, tween_type, values),
            None => tracing::warn!("Accessor for {} used on a foreign target", type_name::<T>()),
        }
    }
}

struct SelfAnimator<T>(PhantomData<fn(&mut T)>);

impl<T: SelfAnimated> Animator for SelfAnimator<T> {
    fn retrieve(&self, target: &dyn Any, tween_type: i32, values: &mut [f32]) -> usize {
        target
            .downcast_ref::<T>()
            .map_or(0, |target| target.retrieve_values(tween_type, values))
    }

    fn animate(&self, target: &mut dyn Any, tween_type: i32, values: &[f32]) {
        if let Some(target) = target.downcast_mut::<T>() {
            target.animate_values(tween_type, values);
        }
    }
}

/// Type tag used to look up animators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetClass {
    id: TypeId,
    name: &'static str,
}

impl TargetClass {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Shared, non-owning-in-spirit handle to a tween target.
///
/// Tweens keep the `Rc` alive while they hold it, but the caller owns the object;
/// a reset tween drops its handle.
#[derive(Clone)]
pub struct TargetRef {
    cell: Rc<RefCell<dyn Any>>,
    class: TargetClass,
    own_animator: Option<Rc<dyn Animator>>,
}

impl TargetRef {
    pub fn new<T: 'static>(target: &Rc<RefCell<T>>) -> Self {
        let cell: Rc<RefCell<dyn Any>> = target.clone();
        Self {
            cell,
            class: TargetClass::of::<T>(),
            own_animator: None,
        }
    }

    /// Wrap a target that animates itself.
    pub fn self_animated<T: SelfAnimated>(target: &Rc<RefCell<T>>) -> Self {
        let mut target_ref = Self::new(target);
        target_ref.own_animator = Some(Rc::new(SelfAnimator::<T>(PhantomData)));
        target_ref
    }

    pub fn class(&self) -> TargetClass {
        self.class
    }

    /// Whether both handles point at the same object
    pub fn ptr_eq(&self, other: &TargetRef) -> bool {
        Rc::as_ptr(&self.cell).cast::<()>() == Rc::as_ptr(&other.cell).cast::<()>()
    }

    /// Whether this handle points at `target`
    pub fn is<T: 'static>(&self, target: &Rc<RefCell<T>>) -> bool {
        Rc::as_ptr(&self.cell).cast::<()>() == Rc::as_ptr(target).cast::<()>()
    }

    pub(crate) fn retrieve(
        &self,
        animator: &dyn Animator,
        tween_type: i32,
        values: &mut [f32],
    ) -> usize {
        match self.cell.try_borrow() {
            Ok(target) => animator.retrieve(&*target, tween_type, values),
            Err(_) => {
                tracing::warn!("Target {} is mutably borrowed, skipping retrieve", self.class.name);
                0
            }
        }
    }

    pub(crate) fn animate(&self, animator: &dyn Animator, tween_type: i32, values: &[f32]) {
        match self.cell.try_borrow_mut() {
            Ok(mut target) => animator.animate(&mut *target, tween_type, values),
            Err(_) => {
                tracing::warn!("Target {} is borrowed, skipping animate", self.class.name);
            }
        }
    }
}

impl<T: 'static> From<&Rc<RefCell<T>>> for TargetRef {
    fn from(target: &Rc<RefCell<T>>) -> Self {
        Self::new(target)
    }
}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRef")
            .field("class", &self.class.name)
            .field("ptr", &Rc::as_ptr(&self.cell))
            .field("self_animated", &self.own_animator.is_some())
            .finish()
    }
}

/// Registry of animators keyed by target class.
///
/// Shared as `Rc<AnimatorRegistry>` between the engine, its pool and every tween
/// it creates. Lookups vastly outnumber registrations.
#[derive(Default)]
pub struct AnimatorRegistry {
    animators: RefCell<FxHashMap<TypeId, Rc<dyn Animator>>>,
    parents: RefCell<FxHashMap<TypeId, TargetClass>>,
}

impl AnimatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed accessor for `T`, replacing any previous one.
    pub fn register<T: 'static, A: Accessor<T> + 'static>(&self, accessor: A) {
        let animator: Rc<dyn Animator> = Rc::new(Typed {
            accessor,
            _target: PhantomData,
        });
        self.register_animator(TargetClass::of::<T>(), animator);
    }

    /// Register an untyped animator for a class. Used for ancestor classes whose
    /// animator handles several concrete types.
    pub fn register_animator(&self, class: TargetClass, animator: Rc<dyn Animator>) {
        tracing::debug!("Registering animator for {}", class.name);
        self.animators.borrow_mut().insert(class.id, animator);
    }

    /// Declare `parent` as the ancestor class consulted when `child` has no animator.
    pub fn declare_parent(&self, child: TargetClass, parent: TargetClass) {
        self.parents.borrow_mut().insert(child.id, parent);
    }

    /// Animator registered for exactly this class
    pub fn get(&self, class: TargetClass) -> Option<Rc<dyn Animator>> {
        self.animators.borrow().get(&class.id).cloned()
    }

    pub fn contains(&self, class: TargetClass) -> bool {
        self.animators.borrow().contains_key(&class.id)
    }

    /// Resolve the animator for a target, optionally looked up as `class`.
    pub fn resolve(
        &self,
        target: &TargetRef,
        class: Option<TargetClass>,
    ) -> Result<Rc<dyn Animator>> {
        let class = class.unwrap_or(target.class);

        if let Some(animator) = self.get(class) {
            return Ok(animator);
        }
        if let Some(animator) = &target.own_animator {
            return Ok(animator.clone());
        }

        let parents = self.parents.borrow();
        let mut current = class;
        // Bounded by the number of declared edges, so a cyclic declaration ends
        for _ in 0..parents.len() {
            let Some(parent) = parents.get(&current.id).copied() else {
                break;
            };
            if let Some(animator) = self.get(parent) {
                tracing::debug!("Resolved animator for {} through {}", class.name, parent.name);
                return Ok(animator);
            }
            current = parent;
        }

        Err(TweenError::NoAnimator {
            type_name: class.name,
        })
    }
}

impl fmt::Debug for AnimatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatorRegistry")
            .field("animators", &self.animators.borrow().len())
            .field("parents", &self.parents.borrow().len())
            .finish()
    }
}
