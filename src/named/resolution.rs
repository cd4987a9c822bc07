//! Named service resolution.

use std::sync::Arc;

use tracing::trace;

use crate::error::{DiError, DiResult};
use crate::key::{Key, ServiceType};
use crate::lookup::NamedKeyBuilder;
use crate::registration::{downcast_service, AnyArc, ServiceSequence};
use crate::traits::ResolverCore;

use super::instance::NamedInstance;
use super::NamedServices;

impl NamedServices {
    /// The last service registered under `(service_type, service_name)`, or
    /// `None` when there is none.
    pub fn try_get_named_service<R>(
        &self,
        resolver: &R,
        service_type: &ServiceType,
        service_name: &str,
    ) -> DiResult<Option<AnyArc>>
    where
        R: ResolverCore + ?Sized,
    {
        validate_request(service_type, service_name)?;

        if let Some(native) = resolver.named_resolution() {
            trace!(service = %service_type, name = service_name, "resolving named service natively");
            return native.get_named_service(service_type, service_name);
        }

        fallback_get(resolver, &self.keys, service_type, service_name)
    }

    /// Like [`try_get_named_service`](Self::try_get_named_service), but a
    /// missing registration is a [`DiError::NotFound`].
    ///
    /// Without native naming the container's own not-found error is returned
    /// as-is; its service is the compound key, which names both the service
    /// type and the name.
    pub fn get_required_named_service<R>(
        &self,
        resolver: &R,
        service_type: &ServiceType,
        service_name: &str,
    ) -> DiResult<AnyArc>
    where
        R: ResolverCore + ?Sized,
    {
        validate_request(service_type, service_name)?;

        if let Some(native) = resolver.required_named_resolution() {
            trace!(service = %service_type, name = service_name, "resolving required named service natively");
            return native.get_required_named_service(service_type, service_name);
        }

        if let Some(native) = resolver.named_resolution() {
            trace!(service = %service_type, name = service_name, "resolving required named service natively");
            return native
                .get_named_service(service_type, service_name)?
                .ok_or_else(|| DiError::named_not_found(service_type, service_name));
        }

        fallback_get_required(resolver, &self.keys, service_type, service_name)
    }

    /// Every service registered under `(service_type, service_name)`, in
    /// registration order. Empty when there are none.
    pub fn get_named_services<R>(
        &self,
        resolver: &R,
        service_type: &ServiceType,
        service_name: &str,
    ) -> DiResult<Vec<AnyArc>>
    where
        R: ResolverCore + ?Sized,
    {
        validate_request(service_type, service_name)?;

        if let Some(native) = resolver.named_resolution() {
            trace!(service = %service_type, name = service_name, "resolving all named services natively");
            return native.get_named_services(service_type, service_name);
        }

        fallback_get_all(resolver, &self.keys, service_type, service_name)
    }

    pub fn get_named<T, R>(&self, resolver: &R, service_name: &str) -> DiResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
        R: ResolverCore + ?Sized,
    {
        self.try_get_named_service(resolver, &ServiceType::of::<T>(), service_name)?
            .map(downcast_service::<T>)
            .transpose()
    }

    pub fn get_required_named<T, R>(&self, resolver: &R, service_name: &str) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
        R: ResolverCore + ?Sized,
    {
        self.get_required_named_service(resolver, &ServiceType::of::<T>(), service_name)
            .and_then(downcast_service::<T>)
    }

    pub fn get_all_named<T, R>(&self, resolver: &R, service_name: &str) -> DiResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
        R: ResolverCore + ?Sized,
    {
        self.get_named_services(resolver, &ServiceType::of::<T>(), service_name)?
            .into_iter()
            .map(downcast_service::<T>)
            .collect()
    }
}

pub(crate) fn validate_request(service_type: &ServiceType, service_name: &str) -> DiResult<()> {
    if !service_type.is_native() {
        return Err(DiError::InvalidArgument("service_type"));
    }
    if service_name.is_empty() {
        return Err(DiError::InvalidArgument("service_name"));
    }
    Ok(())
}

pub(crate) fn fallback_get<R>(
    resolver: &R,
    keys: &NamedKeyBuilder,
    service_type: &ServiceType,
    service_name: &str,
) -> DiResult<Option<AnyArc>>
where
    R: ResolverCore + ?Sized,
{
    let Some(key) = keys.find_key(service_type, service_name).map(Key::Type) else {
        return Ok(None);
    };
    trace!(key = %key, "resolving named service by compound key");
    if !resolver.is_registered(&key) {
        return Ok(None);
    }
    resolver.resolve_any(&key).and_then(NamedInstance::unwrap).map(Some)
}

pub(crate) fn fallback_get_required<R>(
    resolver: &R,
    keys: &NamedKeyBuilder,
    service_type: &ServiceType,
    service_name: &str,
) -> DiResult<AnyArc>
where
    R: ResolverCore + ?Sized,
{
    let Some(key) = keys.find_key(service_type, service_name).map(Key::Type) else {
        return Err(unregistered(service_type, service_name));
    };
    trace!(key = %key, "resolving required named service by compound key");
    resolver.resolve_any(&key).and_then(NamedInstance::unwrap)
}

pub(crate) fn fallback_get_all<R>(
    resolver: &R,
    keys: &NamedKeyBuilder,
    service_type: &ServiceType,
    service_name: &str,
) -> DiResult<Vec<AnyArc>>
where
    R: ResolverCore + ?Sized,
{
    let Some(key) = keys.find_key(service_type, service_name).map(Key::Type) else {
        return Ok(Vec::new());
    };
    trace!(key = %key, "resolving all named services by compound key");
    resolver
        .resolve_many(&key)?
        .into_iter()
        .map(NamedInstance::unwrap)
        .collect()
}

/// The error the container reports for a compound key that was never
/// registered, for names that never got a marker.
fn unregistered(service_type: &ServiceType, service_name: &str) -> DiError {
    DiError::not_found(format!("Named<{}, {:?}>", service_type, service_name))
}

/// Enumerates through the container's `Many<Named<..>>` support instead of
/// `resolve_many`.
pub(crate) fn fallback_get_sequence<R>(
    resolver: &R,
    keys: &NamedKeyBuilder,
    service_type: &ServiceType,
    service_name: &str,
) -> DiResult<Vec<AnyArc>>
where
    R: ResolverCore + ?Sized,
{
    let Some(key) = keys.find_enumerable_key(service_type, service_name).map(Key::Type) else {
        return Ok(Vec::new());
    };
    trace!(key = %key, "resolving named service sequence");
    let sequence = downcast_service::<ServiceSequence>(resolver.resolve_any(&key)?)?;
    sequence.0.iter().cloned().map(NamedInstance::unwrap).collect()
}
