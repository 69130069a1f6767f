use async_trait::async_trait;
use log::{debug, info};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};

use super::send_builder;
use crate::{
    domain::{
        instructions::{
            metadata::{
                create_master_edition_v3, create_metadata_account_v3,
                CreateMasterEditionAccounts, CreateMetadataAccounts, CreateMetadataArgs,
                MetadataData,
            },
            token::{
                create_associated_token_account, create_mint_account, initialize_mint, mint_to,
                MINT_ACCOUNT_SIZE,
            },
        },
        pda::{find_master_edition_pda, find_metadata_pda},
        BuilderContext, InstructionWithSigners, OperationHandler, Scope, SendAndConfirmResponse,
        TransactionBuilder, MASTER_EDITION_ADDRESS_KEY, METADATA_ADDRESS_KEY, MINT_ADDRESS_KEY,
        TOKEN_ADDRESS_KEY,
    },
    models::{
        signer_ref, ClientContext, ClientError, CollectionLink, Creator, SignerRef, Uses,
    },
    services::ProgramRegistry,
};

pub struct CreateNftInput {
    pub uri: String,
    pub name: String,
    pub symbol: String,
    pub seller_fee_basis_points: u16,
    /// Defaults to the update authority as the single, verified creator.
    pub creators: Option<Vec<Creator>>,
    pub is_mutable: bool,
    /// `Some(0)` makes a one of one; `None` allows unlimited prints.
    pub max_supply: Option<u64>,
    pub collection: Option<Pubkey>,
    /// Makes the new asset a sized collection parent.
    pub collection_size: Option<u64>,
    pub uses: Option<Uses>,
    /// Freshly generated when not given.
    pub mint: Option<SignerRef>,
    pub update_authority: Option<SignerRef>,
    pub mint_authority: Option<SignerRef>,
    /// Owner of the minted token, the update authority by default.
    pub token_owner: Option<Pubkey>,
    /// The mint authority by default.
    pub freeze_authority: Option<Pubkey>,
    pub payer: Option<SignerRef>,
}

impl CreateNftInput {
    pub fn new(uri: impl Into<String>, name: impl Into<String>, seller_fee_basis_points: u16) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            symbol: String::new(),
            seller_fee_basis_points,
            creators: None,
            is_mutable: true,
            max_supply: Some(0),
            collection: None,
            collection_size: None,
            uses: None,
            mint: None,
            update_authority: None,
            mint_authority: None,
            token_owner: None,
            freeze_authority: None,
            payer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateNftOutput {
    pub response: SendAndConfirmResponse,
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
    pub token: Pubkey,
}

/// Signers resolved from the input and client defaults.
pub struct CreateNftSigners {
    pub payer: SignerRef,
    pub mint: SignerRef,
    pub update_authority: SignerRef,
    pub mint_authority: SignerRef,
}

/// Account creation and initialization of a 0-decimal mint.
///
/// Publishes the mint address under `MINT_ADDRESS_KEY`.
pub fn create_mint_builder(
    programs: &ProgramRegistry,
    payer: &SignerRef,
    mint: &SignerRef,
    mint_authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
    rent_lamports: u64,
) -> Result<TransactionBuilder, ClientError> {
    let token_program = programs.token()?;
    let mint_address = mint.pubkey();

    Ok(TransactionBuilder::make()
        .add(
            InstructionWithSigners::new(
                create_mint_account(&payer.pubkey(), &mint_address, rent_lamports, &token_program),
                vec![payer.clone(), mint.clone()],
            )
            .with_key("createAccount"),
        )
        .add(
            InstructionWithSigners::new(
                initialize_mint(
                    &token_program,
                    &mint_address,
                    mint_authority,
                    freeze_authority,
                    0,
                )?,
                vec![],
            )
            .with_key("initializeMint"),
        )
        .set_context(BuilderContext::new().with(MINT_ADDRESS_KEY, mint_address)))
}

/// Associated token account creation followed by minting `amount` tokens into it.
///
/// Publishes the token address under `TOKEN_ADDRESS_KEY`.
pub fn create_token_builder(
    programs: &ProgramRegistry,
    payer: &SignerRef,
    mint: &Pubkey,
    owner: &Pubkey,
    mint_authority: &SignerRef,
    amount: u64,
) -> Result<TransactionBuilder, ClientError> {
    let token_program = programs.token()?;
    let (create_token, token) =
        create_associated_token_account(&payer.pubkey(), owner, mint, &token_program);

    Ok(TransactionBuilder::make()
        .add(
            InstructionWithSigners::new(create_token, vec![payer.clone()])
                .with_key("createAssociatedToken"),
        )
        .add(
            InstructionWithSigners::new(
                mint_to(
                    &token_program,
                    mint,
                    &token,
                    &mint_authority.pubkey(),
                    amount,
                )?,
                vec![mint_authority.clone()],
            )
            .with_key("mintTokens"),
        )
        .set_context(BuilderContext::new().with(TOKEN_ADDRESS_KEY, token)))
}

/// Metadata and master edition for the mint published by a mint builder.
///
/// Publishes the metadata and edition addresses.
fn create_metadata_builder(
    programs: &ProgramRegistry,
    input: &CreateNftInput,
    signers: &CreateNftSigners,
    mint: &Pubkey,
) -> Result<TransactionBuilder, ClientError> {
    let metadata_program = programs.token_metadata()?;
    let system_program = programs.system()?;
    let update_authority = signers.update_authority.pubkey();
    let mint_authority = signers.mint_authority.pubkey();

    let metadata = find_metadata_pda(&metadata_program, mint)?.address;
    let master_edition = find_master_edition_pda(&metadata_program, mint)?.address;

    let creators = input.creators.clone().unwrap_or_else(|| {
        vec![Creator {
            address: update_authority,
            verified: true,
            share: 100,
        }]
    });

    let create_metadata = create_metadata_account_v3(
        &metadata_program,
        &CreateMetadataAccounts {
            metadata,
            mint: *mint,
            mint_authority,
            payer: signers.payer.pubkey(),
            update_authority,
            system_program,
        },
        &CreateMetadataArgs {
            data: MetadataData {
                name: input.name.clone(),
                symbol: input.symbol.clone(),
                uri: input.uri.clone(),
                seller_fee_basis_points: input.seller_fee_basis_points,
                creators: Some(creators),
                collection: input.collection.map(|key| CollectionLink {
                    key,
                    verified: false,
                }),
                uses: input.uses.clone(),
            },
            is_mutable: input.is_mutable,
            collection_size: input.collection_size,
        },
    );

    let create_master_edition = create_master_edition_v3(
        &metadata_program,
        &CreateMasterEditionAccounts {
            edition: master_edition,
            mint: *mint,
            update_authority,
            mint_authority,
            payer: signers.payer.pubkey(),
            metadata,
            token_program: programs.token()?,
            system_program,
        },
        input.max_supply,
    );

    let metadata_signers = vec![
        signers.payer.clone(),
        signers.mint_authority.clone(),
        signers.update_authority.clone(),
    ];

    Ok(TransactionBuilder::make()
        .add(
            InstructionWithSigners::new(create_metadata, metadata_signers.clone())
                .with_key("createMetadata"),
        )
        .add(
            InstructionWithSigners::new(create_master_edition, metadata_signers)
                .with_key("createMasterEdition"),
        )
        .set_context(
            BuilderContext::new()
                .with(METADATA_ADDRESS_KEY, metadata)
                .with(MASTER_EDITION_ADDRESS_KEY, master_edition),
        ))
}

/// The whole create flow as one transaction: mint, token, metadata, master edition.
///
/// The token and metadata steps target the mint address the mint builder publishes.
pub fn create_nft_builder(
    programs: &ProgramRegistry,
    input: &CreateNftInput,
    signers: &CreateNftSigners,
    rent_lamports: u64,
) -> Result<TransactionBuilder, ClientError> {
    let mint_authority = signers.mint_authority.pubkey();
    let token_owner = input
        .token_owner
        .unwrap_or_else(|| signers.update_authority.pubkey());
    let freeze_authority = input.freeze_authority.unwrap_or(mint_authority);

    let mint_builder = create_mint_builder(
        programs,
        &signers.payer,
        &signers.mint,
        &mint_authority,
        Some(&freeze_authority),
        rent_lamports,
    )?;
    let mint = mint_builder
        .context()
        .get_pubkey(MINT_ADDRESS_KEY)
        .ok_or_else(|| ClientError::MissingInput(format!("{MINT_ADDRESS_KEY} in builder context")))?;

    let token_builder = create_token_builder(
        programs,
        &signers.payer,
        &mint,
        &token_owner,
        &signers.mint_authority,
        1,
    )?;
    let metadata_builder = create_metadata_builder(programs, input, signers, &mint)?;

    debug!("Composing create flow for mint {}", mint);

    Ok(TransactionBuilder::make()
        .set_fee_payer(signers.payer.clone())
        .add(mint_builder)
        .add(token_builder)
        .add(metadata_builder))
}

pub struct CreateNftHandler;

#[async_trait]
impl OperationHandler<CreateNftInput, CreateNftOutput> for CreateNftHandler {
    async fn handle(
        &self,
        input: CreateNftInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<CreateNftOutput, ClientError> {
        let programs = scope.programs(ctx);
        let update_authority = ctx.identity_or_default(input.update_authority.clone())?;
        let signers = CreateNftSigners {
            payer: ctx.payer_or_default(input.payer.clone())?,
            mint: input
                .mint
                .clone()
                .unwrap_or_else(|| signer_ref(Keypair::new())),
            mint_authority: input
                .mint_authority
                .clone()
                .unwrap_or_else(|| update_authority.clone()),
            update_authority,
        };

        scope.throw_if_canceled()?;
        let rent_lamports = ctx
            .provider
            .get_minimum_balance_for_rent_exemption(MINT_ACCOUNT_SIZE)
            .await?;

        let builder = create_nft_builder(programs, &input, &signers, rent_lamports)?;
        let response = send_builder(builder, ctx, scope).await?;

        let context = &response.context;
        let missing = |key: &str| ClientError::MissingInput(format!("{key} in builder context"));
        let output = CreateNftOutput {
            mint: context
                .get_pubkey(MINT_ADDRESS_KEY)
                .ok_or_else(|| missing(MINT_ADDRESS_KEY))?,
            metadata: context
                .get_pubkey(METADATA_ADDRESS_KEY)
                .ok_or_else(|| missing(METADATA_ADDRESS_KEY))?,
            master_edition: context
                .get_pubkey(MASTER_EDITION_ADDRESS_KEY)
                .ok_or_else(|| missing(MASTER_EDITION_ADDRESS_KEY))?,
            token: context
                .get_pubkey(TOKEN_ADDRESS_KEY)
                .ok_or_else(|| missing(TOKEN_ADDRESS_KEY))?,
            response,
        };
        info!("Created NFT {} ({})", output.mint, output.response.signature);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{
            ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
            TOKEN_PROGRAM_ID,
        },
        models::Cluster,
    };

    fn create_test_signers() -> CreateNftSigners {
        let authority = signer_ref(Keypair::new());
        CreateNftSigners {
            payer: signer_ref(Keypair::new()),
            mint: signer_ref(Keypair::new()),
            update_authority: authority.clone(),
            mint_authority: authority,
        }
    }

    #[test]
    fn test_create_nft_builder_order_and_keys() {
        let programs = ProgramRegistry::new(Cluster::Devnet);
        let signers = create_test_signers();
        let input = CreateNftInput::new("https://example.com/nft.json", "My NFT", 500);

        let builder = create_nft_builder(&programs, &input, &signers, 1_461_600).unwrap();

        let keys: Vec<_> = builder
            .records()
            .iter()
            .map(|record| record.key.clone().unwrap_or_default())
            .collect();
        assert_eq!(
            keys,
            vec![
                "createAccount",
                "initializeMint",
                "createAssociatedToken",
                "mintTokens",
                "createMetadata",
                "createMasterEdition"
            ]
        );
        let programs_used: Vec<_> = builder
            .instructions()
            .iter()
            .map(|ix| ix.program_id)
            .collect();
        assert_eq!(
            programs_used,
            vec![
                SYSTEM_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                ASSOCIATED_TOKEN_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                TOKEN_METADATA_PROGRAM_ID,
                TOKEN_METADATA_PROGRAM_ID
            ]
        );
    }

    #[test]
    fn test_create_nft_builder_context_and_signers() {
        let programs = ProgramRegistry::new(Cluster::Devnet);
        let signers = create_test_signers();
        let input = CreateNftInput::new("https://example.com/nft.json", "My NFT", 500);
        let mint = signers.mint.pubkey();

        let builder = create_nft_builder(&programs, &input, &signers, 1_461_600).unwrap();

        let context = builder.context();
        assert_eq!(context.get_pubkey(MINT_ADDRESS_KEY), Some(mint));
        assert_eq!(
            context.get_pubkey(METADATA_ADDRESS_KEY),
            Some(
                find_metadata_pda(&TOKEN_METADATA_PROGRAM_ID, &mint)
                    .unwrap()
                    .address
            )
        );
        assert!(context.get_pubkey(TOKEN_ADDRESS_KEY).is_some());

        let signer_keys: Vec<_> = builder.signers().iter().map(|s| s.pubkey()).collect();
        assert_eq!(
            signer_keys,
            vec![
                signers.payer.pubkey(),
                mint,
                signers.update_authority.pubkey()
            ]
        );
    }

    #[test]
    fn test_create_mint_builder_publishes_mint() {
        let programs = ProgramRegistry::new(Cluster::Devnet);
        let payer = signer_ref(Keypair::new());
        let mint = signer_ref(Keypair::new());

        let builder =
            create_mint_builder(&programs, &payer, &mint, &payer.pubkey(), None, 1).unwrap();

        assert_eq!(builder.instruction_count(), 2);
        assert_eq!(
            builder.context().get_pubkey(MINT_ADDRESS_KEY),
            Some(mint.pubkey())
        );
        assert!(builder.fee_payer().is_none());
    }

    #[test]
    fn test_freeze_authority_defaults_to_mint_authority() {
        let programs = ProgramRegistry::new(Cluster::Devnet);
        let signers = create_test_signers();
        let input = CreateNftInput::new("https://example.com/nft.json", "My NFT", 500);

        let builder = create_nft_builder(&programs, &input, &signers, 1_461_600).unwrap();

        let initialize = &builder.instructions_with_key("initializeMint")[0].instruction;
        // tag, decimals, mint authority, then COption freeze authority
        assert_eq!(&initialize.data[2..34], signers.mint_authority.pubkey().as_ref());
        assert_eq!(initialize.data[34], 1);
        assert_eq!(&initialize.data[35..67], signers.mint_authority.pubkey().as_ref());
    }

    #[test]
    fn test_explicit_freeze_authority_is_kept() {
        let programs = ProgramRegistry::new(Cluster::Devnet);
        let signers = create_test_signers();
        let freeze_authority = Pubkey::new_unique();
        let mut input = CreateNftInput::new("https://example.com/nft.json", "My NFT", 500);
        input.freeze_authority = Some(freeze_authority);

        let builder = create_nft_builder(&programs, &input, &signers, 1_461_600).unwrap();

        let initialize = &builder.instructions_with_key("initializeMint")[0].instruction;
        assert_eq!(&initialize.data[35..67], freeze_authority.as_ref());
    }

    #[test]
    fn test_metadata_builder_targets_given_mint() {
        let programs = ProgramRegistry::new(Cluster::Devnet);
        let signers = create_test_signers();
        let input = CreateNftInput::new("https://example.com/nft.json", "My NFT", 500);
        let mint = Pubkey::new_unique();

        let builder = create_metadata_builder(&programs, &input, &signers, &mint).unwrap();

        let create_metadata = &builder.instructions()[0];
        assert_eq!(create_metadata.accounts[1].pubkey, mint);
        assert_eq!(
            builder.context().get_pubkey(METADATA_ADDRESS_KEY),
            Some(
                find_metadata_pda(&TOKEN_METADATA_PROGRAM_ID, &mint)
                    .unwrap()
                    .address
            )
        );
    }
}
