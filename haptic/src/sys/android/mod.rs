//! Android vibrator backend using JNI and `Vibrator` / `VibrationEffect`.

use crate::{Amplitude, HapticBackend, HapticError, Waveform};
use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};
use log::warn;
use std::time::Duration;

/// First SDK level with `VibrationEffect` (Android 8.0).
const SDK_OREO: i32 = 26;

const VIBRATION_EFFECT: &str = "android/os/VibrationEffect";
const VIBRATE_EFFECT_SIG: &str = "(Landroid/os/VibrationEffect;)V";

/// Convert a JNI failure, clearing any pending Java exception first.
fn platform_error(env: &mut JNIEnv, what: &str, err: JniError) -> HapticError {
    if matches!(err, JniError::JavaException) {
        let _ = env.exception_clear();
    }
    HapticError::Platform(format!("{what}: {err}"))
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Vibrator backend over the `Vibrator` system service.
pub struct AndroidVibrator {
    vm: JavaVM,
    vibrator: GlobalRef,
    sdk_int: i32,
}

impl std::fmt::Debug for AndroidVibrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidVibrator")
            .field("sdk_int", &self.sdk_int)
            .finish_non_exhaustive()
    }
}

impl AndroidVibrator {
    /// Look up the `Vibrator` through `context`.
    ///
    /// # Errors
    /// Returns [`HapticError::NotSupported`] if the service is unavailable, or
    /// [`HapticError::Platform`] if a JNI call fails.
    pub fn with_context(env: &mut JNIEnv, context: &JObject) -> Result<Self, HapticError> {
        let sdk_int = env
            .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
            .and_then(|value| value.i())
            .map_err(|e| platform_error(env, "Build.VERSION.SDK_INT", e))?;

        let service_name = env
            .new_string("vibrator")
            .map_err(|e| platform_error(env, "new_string", e))?;

        let vibrator = env
            .call_method(
                context,
                "getSystemService",
                "(Ljava/lang/String;)Ljava/lang/Object;",
                &[JValue::Object(&service_name)],
            )
            .and_then(|value| value.l())
            .map_err(|e| platform_error(env, "getSystemService", e))?;

        if vibrator.is_null() {
            return Err(HapticError::NotSupported);
        }

        let vibrator = env
            .new_global_ref(vibrator)
            .map_err(|e| platform_error(env, "new_global_ref", e))?;
        let vm = env
            .get_java_vm()
            .map_err(|e| platform_error(env, "get_java_vm", e))?;

        Ok(Self {
            vm,
            vibrator,
            sdk_int,
        })
    }

    fn with_env<T>(
        &self,
        f: impl FnOnce(&mut JNIEnv) -> Result<T, HapticError>,
    ) -> Result<T, HapticError> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| HapticError::Platform(format!("attach_current_thread: {e}")))?;
        f(&mut *env)
    }

    fn query(&self, method: &str) -> Result<bool, HapticError> {
        self.with_env(|env| {
            env.call_method(self.vibrator.as_obj(), method, "()Z", &[])
                .and_then(|value| value.z())
                .map_err(|e| platform_error(env, method, e))
        })
    }

    fn vibrate_effect(&self, env: &mut JNIEnv, effect: &JObject) -> Result<(), HapticError> {
        env.call_method(
            self.vibrator.as_obj(),
            "vibrate",
            VIBRATE_EFFECT_SIG,
            &[JValue::Object(effect)],
        )
        .map_err(|e| platform_error(env, "vibrate(VibrationEffect)", e))?;
        Ok(())
    }
}

impl HapticBackend for AndroidVibrator {
    fn has_vibrator(&self) -> bool {
        self.query("hasVibrator").unwrap_or_else(|e| {
            warn!("hasVibrator failed: {e}");
            false
        })
    }

    fn has_amplitude_control(&self) -> bool {
        if self.sdk_int < SDK_OREO {
            return false;
        }
        self.query("hasAmplitudeControl").unwrap_or_else(|e| {
            warn!("hasAmplitudeControl failed: {e}");
            false
        })
    }

    fn vibrate_once(&self, duration: Duration, amplitude: Amplitude) -> Result<(), HapticError> {
        let ms = millis(duration);
        self.with_env(|env| {
            if self.sdk_int >= SDK_OREO {
                let effect = env
                    .call_static_method(
                        VIBRATION_EFFECT,
                        "createOneShot",
                        "(JI)Landroid/os/VibrationEffect;",
                        &[JValue::Long(ms), JValue::Int(amplitude.raw())],
                    )
                    .and_then(|value| value.l())
                    .map_err(|e| platform_error(env, "createOneShot", e))?;
                self.vibrate_effect(env, &effect)
            } else {
                env.call_method(self.vibrator.as_obj(), "vibrate", "(J)V", &[JValue::Long(ms)])
                    .map_err(|e| platform_error(env, "vibrate(long)", e))?;
                Ok(())
            }
        })
    }

    fn vibrate_waveform(&self, waveform: &Waveform) -> Result<(), HapticError> {
        let timings = waveform.timings_millis();
        let length = i32::try_from(timings.len())
            .map_err(|_| HapticError::InvalidPattern("pattern too long".into()))?;
        let repeat = waveform.repeat_raw();

        self.with_env(|env| {
            let timing_array = env
                .new_long_array(length)
                .map_err(|e| platform_error(env, "new_long_array", e))?;
            env.set_long_array_region(&timing_array, 0, &timings)
                .map_err(|e| platform_error(env, "set_long_array_region", e))?;

            if self.sdk_int < SDK_OREO {
                env.call_method(
                    self.vibrator.as_obj(),
                    "vibrate",
                    "([JI)V",
                    &[JValue::Object(&timing_array), JValue::Int(repeat)],
                )
                .map_err(|e| platform_error(env, "vibrate(long[], int)", e))?;
                return Ok(());
            }

            let effect = if let Some(amplitudes) = &waveform.amplitudes {
                let amplitude_array = env
                    .new_int_array(length)
                    .map_err(|e| platform_error(env, "new_int_array", e))?;
                env.set_int_array_region(&amplitude_array, 0, amplitudes)
                    .map_err(|e| platform_error(env, "set_int_array_region", e))?;
                env.call_static_method(
                    VIBRATION_EFFECT,
                    "createWaveform",
                    "([J[II)Landroid/os/VibrationEffect;",
                    &[
                        JValue::Object(&timing_array),
                        JValue::Object(&amplitude_array),
                        JValue::Int(repeat),
                    ],
                )
            } else {
                env.call_static_method(
                    VIBRATION_EFFECT,
                    "createWaveform",
                    "([JI)Landroid/os/VibrationEffect;",
                    &[JValue::Object(&timing_array), JValue::Int(repeat)],
                )
            }
            .and_then(|value| value.l())
            .map_err(|e| platform_error(env, "createWaveform", e))?;

            self.vibrate_effect(env, &effect)
        })
    }

    fn cancel(&self) -> Result<(), HapticError> {
        self.with_env(|env| {
            env.call_method(self.vibrator.as_obj(), "cancel", "()V", &[])
                .map_err(|e| platform_error(env, "cancel", e))?;
            Ok(())
        })
    }
}
