//! Android volume backend using JNI and `AudioManager`.

use crate::{StreamCategory, VolumeBackend, VolumeError};
use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};

/// `AudioManager.FLAG_SHOW_UI`.
const FLAG_SHOW_UI: i32 = 1;

/// Convert a JNI failure, clearing any pending Java exception first.
fn platform_error(env: &mut JNIEnv, what: &str, err: JniError) -> VolumeError {
    if matches!(err, JniError::JavaException) {
        let _ = env.exception_clear();
    }
    VolumeError::Platform(format!("{what}: {err}"))
}

/// Volume backend over the `AudioManager` system service.
///
/// Holds a global reference to the service, so it can be used from any
/// thread; each call attaches the current thread to the VM.
pub struct AndroidVolume {
    vm: JavaVM,
    audio_manager: GlobalRef,
}

impl std::fmt::Debug for AndroidVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidVolume").finish_non_exhaustive()
    }
}

impl AndroidVolume {
    /// Look up the `AudioManager` through `context`.
    ///
    /// # Errors
    /// Returns [`VolumeError::NotSupported`] if the service is unavailable, or
    /// [`VolumeError::Platform`] if a JNI call fails.
    pub fn with_context(env: &mut JNIEnv, context: &JObject) -> Result<Self, VolumeError> {
        let service_name = env
            .new_string("audio")
            .map_err(|e| platform_error(env, "new_string", e))?;

        let manager = env
            .call_method(
                context,
                "getSystemService",
                "(Ljava/lang/String;)Ljava/lang/Object;",
                &[JValue::Object(&service_name)],
            )
            .and_then(|value| value.l())
            .map_err(|e| platform_error(env, "getSystemService", e))?;

        if manager.is_null() {
            return Err(VolumeError::NotSupported);
        }

        let audio_manager = env
            .new_global_ref(manager)
            .map_err(|e| platform_error(env, "new_global_ref", e))?;
        let vm = env
            .get_java_vm()
            .map_err(|e| platform_error(env, "get_java_vm", e))?;

        Ok(Self { vm, audio_manager })
    }

    fn call_int(&self, method: &str, category: StreamCategory) -> Result<u32, VolumeError> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| VolumeError::Platform(format!("attach_current_thread: {e}")))?;

        let value = env
            .call_method(
                self.audio_manager.as_obj(),
                method,
                "(I)I",
                &[JValue::Int(category.tag())],
            )
            .and_then(|value| value.i())
            .map_err(|e| platform_error(&mut env, method, e))?;

        u32::try_from(value)
            .map_err(|_| VolumeError::Platform(format!("{method} returned {value}")))
    }
}

impl VolumeBackend for AndroidVolume {
    fn current_step(&self, category: StreamCategory) -> Result<u32, VolumeError> {
        self.call_int("getStreamVolume", category)
    }

    fn max_step(&self, category: StreamCategory) -> Result<u32, VolumeError> {
        self.call_int("getStreamMaxVolume", category)
    }

    fn set_step(
        &self,
        category: StreamCategory,
        step: u32,
        show_ui: bool,
    ) -> Result<(), VolumeError> {
        let step = i32::try_from(step)
            .map_err(|_| VolumeError::Platform(format!("step {step} out of range")))?;
        let flags = if show_ui { FLAG_SHOW_UI } else { 0 };

        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| VolumeError::Platform(format!("attach_current_thread: {e}")))?;

        env.call_method(
            self.audio_manager.as_obj(),
            "setStreamVolume",
            "(III)V",
            &[
                JValue::Int(category.tag()),
                JValue::Int(step),
                JValue::Int(flags),
            ],
        )
        .map_err(|e| platform_error(&mut env, "setStreamVolume", e))?;

        Ok(())
    }
}
