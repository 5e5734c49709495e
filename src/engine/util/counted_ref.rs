use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RefCountError {
    #[error("the instance has already been released")]
    Released,

    #[error("no outstanding reference to return")]
    NotTaken,

    #[error("returned instance is not the one being counted")]
    WrongInstance,

    #[error("no cached instance under this key")]
    NotCached,
}

/// Counts how many holders are using one shared instance and reports when
/// the last of them lets go.
#[derive(Debug)]
pub struct CountedRef<T> {
    instance: Option<Rc<T>>,
    count: usize,
}

impl<T> CountedRef<T> {
    pub fn new(instance: T) -> Self {
        Self::from_rc(Rc::new(instance))
    }

    pub fn from_rc(instance: Rc<T>) -> Self {
        Self {
            instance: Some(instance),
            count: 0,
        }
    }

    /// Hands out the counted instance. Every call returns the same `Rc`.
    pub fn take_ref(&mut self) -> Result<Rc<T>, RefCountError> {
        let instance = self.instance.as_ref().ok_or(RefCountError::Released)?;
        self.count += 1;
        Ok(Rc::clone(instance))
    }

    /// Gives back one reference. Returns `true` when it was the last one, at
    /// which point the wrapper lets go of the instance.
    pub fn return_ref(&mut self, instance: &Rc<T>) -> Result<bool, RefCountError> {
        if self.count == 0 {
            return Err(RefCountError::NotTaken);
        }
        match &self.instance {
            Some(held) if Rc::ptr_eq(held, instance) => {}
            _ => return Err(RefCountError::WrongInstance),
        }

        self.count -= 1;
        let released = self.count == 0;
        if released {
            self.instance = None;
        }
        Ok(released)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_released(&self) -> bool {
        self.instance.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_ref_returns_the_same_instance() {
        let mut counted = CountedRef::new(String::from("texture"));
        let a = counted.take_ref().unwrap();
        let b = counted.take_ref().unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(counted.count(), 2);
    }

    #[test]
    fn only_the_last_return_releases() {
        let mut counted = CountedRef::new(5);
        let refs: Vec<_> = (0..3).map(|_| counted.take_ref().unwrap()).collect();

        assert_eq!(counted.return_ref(&refs[0]), Ok(false));
        assert_eq!(counted.return_ref(&refs[1]), Ok(false));
        assert_eq!(counted.return_ref(&refs[2]), Ok(true));
        assert!(counted.is_released());
    }

    #[test]
    fn returning_too_many_refs_fails() {
        let mut counted = CountedRef::new(5);
        let a = counted.take_ref().unwrap();
        assert_eq!(counted.return_ref(&a), Ok(true));
        assert_eq!(counted.return_ref(&a), Err(RefCountError::NotTaken));
    }

    #[test]
    fn returning_before_taking_fails() {
        let instance = Rc::new(5);
        let mut counted = CountedRef::from_rc(Rc::clone(&instance));
        assert_eq!(counted.return_ref(&instance), Err(RefCountError::NotTaken));
    }

    #[test]
    fn returning_a_different_instance_fails() {
        let mut counted = CountedRef::new(5);
        let _taken = counted.take_ref().unwrap();
        let impostor = Rc::new(5);
        assert_eq!(counted.return_ref(&impostor), Err(RefCountError::WrongInstance));
        assert_eq!(counted.count(), 1);
    }

    #[test]
    fn released_instance_cannot_be_taken_again() {
        let mut counted = CountedRef::new(5);
        let a = counted.take_ref().unwrap();
        counted.return_ref(&a).unwrap();
        assert_eq!(counted.take_ref(), Err(RefCountError::Released));
    }
}
