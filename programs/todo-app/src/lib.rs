//! # Todo Program
//!
//! On-chain todo list keyed by deterministic program-derived addresses.
//!
//! Each wallet owns at most one [`Profile`], created once at a PDA derived
//! from the wallet's pubkey. Todos hang off the profile at PDAs derived from
//! the profile address plus a single-byte sequence index, so any party can
//! recompute every account address from the owner's pubkey alone.
//!
//! ## PDA layout
//!
//! | Account | Seeds |
//! |---------|-------|
//! | `Profile` | `["profile", owner]` |
//! | `Todo` | `["todo", profile, [index]]` |
//!
//! The todo index is encoded as one seed byte, which caps a profile at
//! [`MAX_TODOS_PER_PROFILE`] todos. Creation past that ceiling fails with
//! [`TodoError::SequenceOverflow`] rather than wrapping.
//!
//! ## Instructions
//!
//! - `create_profile(name)` — allocates the caller's profile (create-once)
//! - `create_todo(content)` — allocates the next todo and bumps the counter
//! - `toggle_todo()` — flips a todo's completion flag
//!
//! Every mutation of an existing profile's state goes through the same
//! authority gate: the signer must equal the stored `Profile.owner`, checked
//! by [`is_profile_owner`] in the account constraints.
//!
//! Callers creating several todos against one profile must confirm each
//! creation before submitting the next: the todo address is derived from the
//! current `todo_count`, so two unconfirmed creations race for the same index
//! and which one lands first is unspecified.

#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

declare_id!("3CEnuHMtRZvXpktYhNo61m163u6FhwLpnb5gYe1tt7RP");

// =============================================================================
// CONSTANTS
// =============================================================================

/// Seed tag for profile PDAs.
pub const PROFILE_SEED: &[u8] = b"profile";

/// Seed tag for todo PDAs.
pub const TODO_SEED: &[u8] = b"todo";

/// Maximum stored length of a profile display name, in bytes.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum stored length of a todo's content, in bytes.
pub const MAX_CONTENT_LEN: usize = 256;

/// Hard ceiling on todos per profile. The sequence index is a single PDA
/// seed byte, so valid indices are 0..=255.
pub const MAX_TODOS_PER_PROFILE: u16 = 256;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks whether `caller` is the stored owner of `profile`.
///
/// This is the single authorization gate for every instruction that mutates
/// state under an existing profile. Both `CreateTodo` and `ToggleTodo`
/// reference it from their account constraints:
///
/// `constraint = is_profile_owner(&profile, creator.key) @ TodoError::InvalidAuthority`
///
/// Keeping the check in one function gives one place to audit instead of
/// repeated constraint expressions.
pub fn is_profile_owner(profile: &Profile, caller: &Pubkey) -> bool {
    profile.owner == *caller
}

/// Derives the profile PDA for `owner`.
///
/// Deterministic: the same owner always maps to the same address, and the
/// `"profile"` tag keeps the namespace disjoint from todo addresses. Clients
/// use this to locate a profile without any prior coordination.
pub fn find_profile_address(owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PROFILE_SEED, owner.as_ref()], &ID)
}

/// Derives the todo PDA for (`profile`, `index`).
///
/// The index is encoded as exactly one seed byte, matching the on-chain
/// `seeds` constraint. No two todos under one profile can share an index
/// because each index maps to a distinct address.
pub fn find_todo_address(profile: &Pubkey, index: u8) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[TODO_SEED, profile.as_ref(), &[index]], &ID)
}

/// Rejects display names longer than [`MAX_NAME_LEN`] bytes.
pub fn validate_name(name: &str) -> std::result::Result<(), TodoError> {
    if name.len() > MAX_NAME_LEN {
        return Err(TodoError::InvalidInput);
    }
    Ok(())
}

/// Rejects todo content longer than [`MAX_CONTENT_LEN`] bytes.
pub fn validate_content(content: &str) -> std::result::Result<(), TodoError> {
    if content.len() > MAX_CONTENT_LEN {
        return Err(TodoError::InvalidInput);
    }
    Ok(())
}

// =============================================================================
// ERROR CODES
// =============================================================================

/// Program error taxonomy.
///
/// Every precondition failure aborts the whole instruction with no persisted
/// mutation and surfaces one of these codes attributed to this program id,
/// so clients can branch on the exact kind.
#[error_code]
pub enum TodoError {
    /// The signer is not the stored owner of the target profile.
    /// This is the only failure path for authorization on any mutating call.
    #[msg("Invalid authority")]
    InvalidAuthority,

    /// Create attempted on an occupied slot. The runtime's `init` path
    /// rejects the allocation itself; this code is reserved in the program
    /// taxonomy so clients branch on one namespace for the condition.
    #[msg("Account already initialized")]
    AccountAlreadyInitialized,

    /// Mutation or read aimed at an unoccupied slot, or an account whose
    /// back-reference does not match the supplied profile.
    #[msg("Account not found")]
    AccountNotFound,

    /// Display name or content exceeds its bounded stored length.
    #[msg("Input exceeds maximum length")]
    InvalidInput,

    /// The next todo index would not fit in the single seed byte.
    /// A profile holds at most 256 todos (indices 0..=255).
    #[msg("Todo index would exceed the per-profile limit")]
    SequenceOverflow,
}

// =============================================================================
// PROGRAM ENTRY POINT
// =============================================================================

#[program]
pub mod todo_app {
    use super::*;

    /// Creates the caller's profile at its derived address.
    ///
    /// Create-once: the PDA for a given owner is fixed, so a second call for
    /// the same owner fails at allocation. Rent for the new account is paid
    /// by the creator.
    ///
    /// # Accounts
    ///
    /// - `creator`: the signer becoming the profile owner, pays rent
    /// - `profile`: the profile PDA to initialize
    /// - `system_program`: required for account creation
    pub fn create_profile(ctx: Context<CreateProfile>, name: String) -> Result<()> {
        validate_name(&name)?;

        let profile = &mut ctx.accounts.profile;
        profile.owner = ctx.accounts.creator.key();
        profile.name = name;
        profile.todo_count = 0;
        profile.bump = ctx.bumps.profile;

        msg!("Profile created for owner: {}", profile.owner);

        Ok(())
    }

    /// Creates the next todo under the caller's profile.
    ///
    /// The todo PDA is derived from the profile's current `todo_count`, and
    /// the counter advances by exactly one on success. Validation failure at
    /// any step aborts with nothing written, so the counter and the derived
    /// address can never fall out of step.
    ///
    /// # Accounts
    ///
    /// - `creator`: the signer, must be the profile owner, pays rent
    /// - `profile`: the owner's profile PDA, counter is advanced
    /// - `todo`: the todo PDA at the current counter value
    /// - `system_program`: required for account creation
    pub fn create_todo(ctx: Context<CreateTodo>, content: String) -> Result<()> {
        validate_content(&content)?;

        let profile = &mut ctx.accounts.profile;
        let index = profile.reserve_todo_index()?;

        let todo = &mut ctx.accounts.todo;
        todo.profile = profile.key();
        todo.content = content;
        todo.completed = false;
        todo.index = index;
        todo.bump = ctx.bumps.todo;

        msg!("Todo {} created under profile: {}", index, todo.profile);

        Ok(())
    }

    /// Flips a todo's completion flag.
    ///
    /// Symmetric two-state transition; re-toggling an already completed todo
    /// is legal and any number of toggles is allowed. Only the profile owner
    /// passes the authority gate, enforced in the account constraints.
    ///
    /// # Accounts
    ///
    /// - `creator`: the signer, must be the profile owner
    /// - `profile`: the profile the todo belongs to
    /// - `todo`: the todo PDA to flip
    pub fn toggle_todo(ctx: Context<ToggleTodo>) -> Result<()> {
        let todo = &mut ctx.accounts.todo;
        todo.toggle();

        msg!("Todo {} completed: {}", todo.index, todo.completed);

        Ok(())
    }
}

// =============================================================================
// ACCOUNT STRUCTURES
// =============================================================================

/// Per-owner profile record.
/// PDA seeds: `["profile", owner]`
#[account]
#[derive(InitSpace)]
pub struct Profile {
    /// The wallet that created this profile. Immutable after init; every
    /// mutating instruction checks the signer against this field.
    pub owner: Pubkey,

    /// Display name, set at creation and never mutated.
    #[max_len(MAX_NAME_LEN)]
    pub name: String,

    /// Number of todos created under this profile, and the sequence index
    /// the next todo will be derived from. Strictly increases by 1 per
    /// successful creation; never decremented.
    ///
    /// Held as `u16` so the full 256-todo ceiling is representable and the
    /// attempt past it fails cleanly instead of wrapping the seed byte.
    pub todo_count: u16,

    /// Canonical PDA bump, stored for re-derivation on later instructions.
    pub bump: u8,
}

impl Profile {
    /// Claims the next sequence index for a new todo and advances the
    /// counter.
    ///
    /// Fails with [`TodoError::SequenceOverflow`] once the profile holds
    /// [`MAX_TODOS_PER_PROFILE`] todos, leaving the counter untouched. The
    /// returned index always fits the single PDA seed byte.
    pub fn reserve_todo_index(&mut self) -> std::result::Result<u8, TodoError> {
        if self.todo_count >= MAX_TODOS_PER_PROFILE {
            return Err(TodoError::SequenceOverflow);
        }
        let index = self.todo_count as u8;
        self.todo_count = self
            .todo_count
            .checked_add(1)
            .ok_or(TodoError::SequenceOverflow)?;
        Ok(index)
    }
}

/// Per-item todo record.
/// PDA seeds: `["todo", profile, [index]]`
#[account]
#[derive(InitSpace)]
pub struct Todo {
    /// Address of the owning profile. Immutable after init; validated
    /// against the supplied profile account on every instruction that
    /// touches this todo.
    pub profile: Pubkey,

    /// Todo text, set at creation and never mutated.
    #[max_len(MAX_CONTENT_LEN)]
    pub content: String,

    /// Completion flag. Starts `false`; flipped by `toggle_todo`.
    pub completed: bool,

    /// Sequence index encoded into this account's PDA seeds. Equal to the
    /// profile's `todo_count` at the moment of creation.
    pub index: u8,

    /// Canonical PDA bump, stored for re-derivation on later instructions.
    pub bump: u8,
}

impl Todo {
    /// Flips the completion flag. Symmetric; no other state changes.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

// =============================================================================
// ACCOUNT VALIDATION CONTEXTS
// =============================================================================

/// Accounts for the create_profile instruction.
#[derive(Accounts)]
pub struct CreateProfile<'info> {
    /// The wallet creating its profile. Signer proves control of the owner
    /// identity; also pays rent for the allocation.
    #[account(mut)]
    pub creator: Signer<'info>,

    /// The profile PDA to create. Deriving from the creator's key fixes one
    /// profile per owner; a repeat create fails because the slot is occupied.
    #[account(
        init,
        payer = creator,
        space = 8 + Profile::INIT_SPACE,
        seeds = [PROFILE_SEED, creator.key().as_ref()],
        bump
    )]
    pub profile: Account<'info, Profile>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,
}

/// Accounts for the create_todo instruction.
///
/// The profile is re-derived from its stored owner (not from the signer), so
/// a non-owner naming the real profile is rejected by the authority
/// constraint with `InvalidAuthority` rather than failing seed validation.
#[derive(Accounts)]
pub struct CreateTodo<'info> {
    /// The signer creating the todo; must be the profile owner. Pays rent.
    #[account(mut)]
    pub creator: Signer<'info>,

    /// The owner's profile. The counter bound is checked here, before the
    /// count is narrowed to the single todo seed byte below.
    #[account(
        mut,
        seeds = [PROFILE_SEED, profile.owner.as_ref()],
        bump = profile.bump,
        constraint = is_profile_owner(&profile, creator.key) @ TodoError::InvalidAuthority,
        constraint = profile.todo_count < MAX_TODOS_PER_PROFILE @ TodoError::SequenceOverflow,
    )]
    pub profile: Account<'info, Profile>,

    /// The todo PDA at the profile's current counter value.
    #[account(
        init,
        payer = creator,
        space = 8 + Todo::INIT_SPACE,
        seeds = [TODO_SEED, profile.key().as_ref(), &[profile.todo_count as u8]],
        bump
    )]
    pub todo: Account<'info, Todo>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,
}

/// Accounts for the toggle_todo instruction.
#[derive(Accounts)]
pub struct ToggleTodo<'info> {
    /// The signer requesting the flip; must be the profile owner.
    pub creator: Signer<'info>,

    /// The profile the todo belongs to. The authority gate lives here and
    /// runs before the todo account is validated.
    #[account(
        seeds = [PROFILE_SEED, profile.owner.as_ref()],
        bump = profile.bump,
        constraint = is_profile_owner(&profile, creator.key) @ TodoError::InvalidAuthority,
    )]
    pub profile: Account<'info, Profile>,

    /// The todo to flip. Re-derived from the supplied profile and the stored
    /// index; a todo whose back-reference does not match the profile is
    /// rejected as not found under that profile.
    #[account(
        mut,
        seeds = [TODO_SEED, profile.key().as_ref(), &[todo.index]],
        bump = todo.bump,
        constraint = todo.profile == profile.key() @ TodoError::AccountNotFound,
    )]
    pub todo: Account<'info, Todo>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_for(owner: Pubkey) -> Profile {
        Profile {
            owner,
            name: "Toan Ho".to_string(),
            todo_count: 0,
            bump: 254,
        }
    }

    #[test]
    fn profile_address_is_deterministic_per_owner() {
        let owner_a = Pubkey::new_unique();
        let owner_b = Pubkey::new_unique();

        let (addr_1, bump_1) = find_profile_address(&owner_a);
        let (addr_2, bump_2) = find_profile_address(&owner_a);
        assert_eq!(addr_1, addr_2);
        assert_eq!(bump_1, bump_2);

        assert_ne!(find_profile_address(&owner_b).0, addr_1);
    }

    #[test]
    fn todo_addresses_are_distinct_across_all_indices() {
        let (profile, _) = find_profile_address(&Pubkey::new_unique());

        let mut addresses: Vec<Pubkey> = (0..=u8::MAX)
            .map(|index| find_todo_address(&profile, index).0)
            .collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), MAX_TODOS_PER_PROFILE as usize);

        // Same (profile, index) always re-derives to the same address.
        assert_eq!(
            find_todo_address(&profile, 7).0,
            find_todo_address(&profile, 7).0
        );

        // A different profile gets a disjoint address for the same index.
        let (other_profile, _) = find_profile_address(&Pubkey::new_unique());
        assert_ne!(
            find_todo_address(&other_profile, 0).0,
            find_todo_address(&profile, 0).0
        );
    }

    #[test]
    fn seed_tags_separate_profile_and_todo_namespaces() {
        // Feed the same 32 raw bytes through both derivations; the tag
        // prefix must keep the address spaces disjoint.
        let key = Pubkey::new_unique();
        let (profile_addr, _) = find_profile_address(&key);
        for index in 0..=u8::MAX {
            assert_ne!(find_todo_address(&key, index).0, profile_addr);
        }
    }

    #[test]
    fn fresh_profile_starts_with_zero_todos() {
        let owner = Pubkey::new_unique();
        let profile = profile_for(owner);
        assert_eq!(profile.owner, owner);
        assert_eq!(profile.name, "Toan Ho");
        assert_eq!(profile.todo_count, 0);
    }

    #[test]
    fn name_and_content_bounds() {
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN)).is_ok());
        assert!(matches!(
            validate_name(&"a".repeat(MAX_NAME_LEN + 1)),
            Err(TodoError::InvalidInput)
        ));

        assert!(validate_content(&"b".repeat(MAX_CONTENT_LEN)).is_ok());
        assert!(matches!(
            validate_content(&"b".repeat(MAX_CONTENT_LEN + 1)),
            Err(TodoError::InvalidInput)
        ));
    }

    #[test]
    fn todo_indices_run_sequentially_to_the_ceiling() {
        let mut profile = profile_for(Pubkey::new_unique());

        for expected in 0..MAX_TODOS_PER_PROFILE {
            let index = profile.reserve_todo_index().unwrap();
            assert_eq!(index as u16, expected);
            assert_eq!(profile.todo_count, expected + 1);
        }
        assert_eq!(profile.todo_count, MAX_TODOS_PER_PROFILE);

        // Attempt at index 256 fails instead of wrapping the seed byte.
        assert!(matches!(
            profile.reserve_todo_index(),
            Err(TodoError::SequenceOverflow)
        ));
        // The failed reservation leaves the counter untouched.
        assert_eq!(profile.todo_count, MAX_TODOS_PER_PROFILE);
    }

    #[test]
    fn double_toggle_restores_completion_state() {
        let (profile_addr, _) = find_profile_address(&Pubkey::new_unique());
        let (_, bump) = find_todo_address(&profile_addr, 0);
        let mut todo = Todo {
            profile: profile_addr,
            content: "Test todo".to_string(),
            completed: false,
            index: 0,
            bump,
        };

        todo.toggle();
        assert!(todo.completed);
        todo.toggle();
        assert!(!todo.completed);

        // Re-toggling an already completed todo is unconditionally legal.
        todo.toggle();
        todo.toggle();
        todo.toggle();
        assert!(todo.completed);
    }

    #[test]
    fn owner_guard_accepts_only_the_stored_owner() {
        let owner = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let profile = profile_for(owner);

        assert!(is_profile_owner(&profile, &owner));
        assert!(!is_profile_owner(&profile, &stranger));
    }

    #[test]
    fn invalid_authority_message_matches_client_assertion() {
        assert_eq!(TodoError::InvalidAuthority.to_string(), "Invalid authority");
    }

    #[test]
    fn account_sizes_match_field_layout() {
        // discriminator + owner + (len prefix + name) + todo_count + bump
        assert_eq!(8 + Profile::INIT_SPACE, 8 + 32 + (4 + MAX_NAME_LEN) + 2 + 1);
        // discriminator + profile + (len prefix + content) + completed + index + bump
        assert_eq!(8 + Todo::INIT_SPACE, 8 + 32 + (4 + MAX_CONTENT_LEN) + 1 + 1 + 1);
    }

    #[test]
    fn profile_serialization_round_trip() {
        let profile = profile_for(Pubkey::new_unique());

        let mut bytes = Vec::new();
        profile.serialize(&mut bytes).unwrap();
        let decoded = Profile::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded.owner, profile.owner);
        assert_eq!(decoded.name, profile.name);
        assert_eq!(decoded.todo_count, profile.todo_count);
        assert_eq!(decoded.bump, profile.bump);
    }

    #[test]
    fn todo_serialization_round_trip() {
        let todo = Todo {
            profile: Pubkey::new_unique(),
            content: "Test todo".to_string(),
            completed: true,
            index: 3,
            bump: 252,
        };

        let mut bytes = Vec::new();
        todo.serialize(&mut bytes).unwrap();
        let decoded = Todo::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded.profile, todo.profile);
        assert_eq!(decoded.content, todo.content);
        assert_eq!(decoded.completed, todo.completed);
        assert_eq!(decoded.index, todo.index);
        assert_eq!(decoded.bump, todo.bump);
    }

    #[test]
    fn owner_toggles_and_stranger_is_rejected() {
        let owner = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();

        // Owner creates a profile and the first todo.
        validate_name("Toan Ho").unwrap();
        let mut profile = profile_for(owner);
        let (profile_addr, _) = find_profile_address(&owner);

        validate_content("Test todo").unwrap();
        let index = profile.reserve_todo_index().unwrap();
        assert_eq!(index, 0);
        assert_eq!(profile.todo_count, 1);

        let (_, bump) = find_todo_address(&profile_addr, index);
        let mut todo = Todo {
            profile: profile_addr,
            content: "Test todo".to_string(),
            completed: false,
            index,
            bump,
        };

        // Owner passes the gate and completes the todo.
        assert!(is_profile_owner(&profile, &owner));
        todo.toggle();
        assert!(todo.completed);

        // A second identity fails the gate; the todo keeps its state.
        assert!(!is_profile_owner(&profile, &stranger));
        assert!(todo.completed);
        assert_eq!(profile.todo_count, 1);
    }
}
